//! Local config file commands.

use std::path::Path;

use crate::cli::{ConfigArgs, ConfigCommands, ConfigSetArgs};
use crate::error::{exit_codes, CliError};
use crate::output::get_formatter;
use crate::settings;

/// Run the config command
pub fn run_config(args: ConfigArgs, path: &Path, json: bool) -> Result<i32, CliError> {
    match args.command {
        ConfigCommands::Show => run_show(path, json),
        ConfigCommands::Set(args) => run_set(args, path, json),
    }
}

fn run_show(path: &Path, json: bool) -> Result<i32, CliError> {
    let current = settings::load(path)?;
    let formatter = get_formatter(json);
    println!("{}", formatter.format_settings(&current, path));
    Ok(exit_codes::SUCCESS)
}

fn run_set(args: ConfigSetArgs, path: &Path, json: bool) -> Result<i32, CliError> {
    let mut current = settings::load(path)?;
    settings::set_key(&mut current, &args.key, &args.value)?;
    settings::save(path, &current)?;

    let formatter = get_formatter(json);
    println!(
        "{}",
        formatter.format_message(&format!("Set {} in {}", args.key, path.display()))
    );
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_show_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let code = run_set(
            ConfigSetArgs {
                key: "host".to_string(),
                value: "dev.local:8080".to_string(),
            },
            &path,
            true,
        )
        .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let loaded = settings::load(&path).unwrap();
        assert_eq!(loaded.host.as_deref(), Some("dev.local:8080"));
    }

    #[test]
    fn test_set_unknown_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let result = run_set(
            ConfigSetArgs {
                key: "speed".to_string(),
                value: "9".to_string(),
            },
            &path,
            false,
        );
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
