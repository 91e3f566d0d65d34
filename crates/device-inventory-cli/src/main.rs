//! # Device Inventory CLI
//!
//! Command-line access to device records: look up, insert, and upsert
//! attributes against the configured store.

use anyhow::{Context, Result};
use device_inventory_core::{Device, DeviceId, IncomingAttributes};
use device_inventory_store::DataStore;
use std::env;
use tracing_subscriber::EnvFilter;

mod config;

use config::CliConfig;

fn main() -> Result<()> {
    let config = CliConfig::from_env();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = Command::parse(&args) else {
        print_help();
        std::process::exit(1);
    };

    if matches!(command, Command::Help) {
        print_help();
        return Ok(());
    }

    tracing::debug!(store_url = %config.store_url, "Opening device store");
    let store = DataStore::open(&config.store_url)
        .with_context(|| format!("Failed to open device store at {}", config.store_url))?;

    let output = command.run(&store)?;
    println!("{output}");

    Ok(())
}

/// A parsed command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Get { id: String },
    Add { device_json: String },
    Upsert { id: String, attributes_json: String },
    Help,
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        let command = match args.first().map(String::as_str) {
            None | Some("help" | "--help" | "-h") => Self::Help,
            Some("get") => Self::Get {
                id: args.get(1)?.clone(),
            },
            Some("add") => Self::Add {
                device_json: args.get(1)?.clone(),
            },
            Some("upsert") => Self::Upsert {
                id: args.get(1)?.clone(),
                attributes_json: args.get(2)?.clone(),
            },
            Some(cmd) => {
                eprintln!("Unknown command: {cmd}");
                return None;
            }
        };
        Some(command)
    }

    fn run(&self, store: &DataStore) -> Result<String> {
        match self {
            Self::Get { id } => {
                let device = store
                    .get_device(&DeviceId::from(id.as_str()))
                    .with_context(|| format!("Failed to get device {id}"))?;
                Ok(serde_json::to_string_pretty(&device)?)
            }
            Self::Add { device_json } => {
                let device: Option<Device> =
                    serde_json::from_str(device_json).context("Invalid device JSON")?;
                store
                    .add_device(device.as_ref())
                    .context("Failed to add device")?;
                Ok("added".to_string())
            }
            Self::Upsert {
                id,
                attributes_json,
            } => {
                let incoming: IncomingAttributes =
                    serde_json::from_str(attributes_json).context("Invalid attributes JSON")?;
                let outcome = store
                    .upsert_attributes(&DeviceId::from(id.as_str()), &incoming)
                    .with_context(|| format!("Failed to upsert attributes of device {id}"))?;
                Ok(outcome.to_string())
            }
            Self::Help => Ok(String::new()),
        }
    }
}

fn print_help() {
    println!(
        r#"Device Inventory CLI

USAGE:
    inventory <COMMAND> [ARGS]

COMMANDS:
    get <id>                      Print a device as JSON (null if absent)
    add <device-json>             Insert a new device record
    upsert <id> <attributes-json> Merge attributes into a device, creating it if absent
    help                          Show this help message

ENVIRONMENT:
    INVENTORY_STORE_URL   Store target (default: sqlite:inventory.db)
                          e.g. memory:, sqlite::memory:, sqlite:///var/lib/inventory.db
    INVENTORY_LOG         Log filter when RUST_LOG is unset (default: info)

EXAMPLES:
    inventory add '{{"_id": "0002", "attributes": {{"mac": {{"name": "mac", "value": "0002-mac"}}}}}}'
    inventory upsert 0002 '{{"ip": {{"value": ["1.2.3.4", "1.2.3.5"], "description": "ip addr array"}}}}'
    inventory get 0002
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse(&args(&[])), Some(Command::Help));
        assert_eq!(
            Command::parse(&args(&["get", "0002"])),
            Some(Command::Get { id: "0002".into() })
        );
        assert_eq!(
            Command::parse(&args(&["upsert", "0002", "{}"])),
            Some(Command::Upsert {
                id: "0002".into(),
                attributes_json: "{}".into()
            })
        );
        assert_eq!(Command::parse(&args(&["upsert", "0002"])), None);
        assert_eq!(Command::parse(&args(&["delete", "0002"])), None);
    }

    #[test]
    fn upsert_then_get() {
        let store = DataStore::open("memory:").unwrap();

        let upsert = Command::Upsert {
            id: "0099".into(),
            attributes_json: r#"{"ip": {"value": ["1.2.3.4", "1.2.3.5"], "description": "ip addr array"}}"#.into(),
        };
        assert_eq!(upsert.run(&store).unwrap(), "created");

        let output = Command::Get { id: "0099".into() }.run(&store).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": "0099",
                "attributes": {
                    "ip": {"name": "ip", "value": ["1.2.3.4", "1.2.3.5"], "description": "ip addr array"}
                }
            })
        );
    }

    #[test]
    fn get_missing_prints_null() {
        let store = DataStore::open("memory:").unwrap();
        let output = Command::Get { id: String::new() }.run(&store).unwrap();
        assert_eq!(output, "null");
    }

    #[test]
    fn add_null_is_rejected() {
        let store = DataStore::open("memory:").unwrap();
        let err = Command::Add {
            device_json: "null".into(),
        }
        .run(&store)
        .unwrap_err();
        assert!(format!("{err:#}").contains("invalid input"));
    }
}
