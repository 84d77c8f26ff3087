//! Shared core library for Radiowatch device management.
//!
//! Contains the HTTP transport to the capture device, the analysis report
//! model, and the alert extraction logic shared by all consumers.

pub mod alerts;
pub mod client;
pub mod error;
pub mod manifest;
pub mod report;
