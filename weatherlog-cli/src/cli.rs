use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use weatherlog_core::{
    Config, WeatherRecord, WeatherService, WeatherStore,
    export::{DEFAULT_CSV_FILE, DEFAULT_JSON_FILE, export_all},
    provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherlog", version, about = "Current weather lookups with a local history")]
pub struct Cli {
    /// History database; overrides `database_path` from the config file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Look up current weather for a city and record it.
    Show {
        /// City name, passed to the provider as typed.
        city: String,
    },

    /// List the most recent lookups.
    History {
        #[arg(short = 'n', long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },

    /// Replace the description of a recorded lookup.
    Update { id: i64, description: String },

    /// Delete a recorded lookup.
    Delete { id: i64 },

    /// Write the full history to JSON and CSV.
    Export {
        #[arg(long, default_value = DEFAULT_JSON_FILE)]
        json: PathBuf,

        #[arg(long, default_value = DEFAULT_CSV_FILE)]
        csv: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure { api_key } => configure(config, api_key)?,
            Command::Show { city } => {
                let store = open_store(&config, self.db)?;
                let service = WeatherService::new(provider_from_config(&config)?, store);

                let report = service.fetch_and_record(&city).await?;
                println!("{:.0}°C", report.celsius);
                if !report.emoji.is_empty() {
                    println!("{}", report.emoji);
                }
                println!("{}", report.description);
            }
            Command::History { limit } => {
                let store = open_store(&config, self.db)?;
                let records = store.list_recent(limit as usize)?;
                if records.is_empty() {
                    println!("No data found in the database.");
                } else {
                    println!("Recent Records\n");
                    println!("{}", format_records(&records));
                }
            }
            Command::Update { id, description } => {
                let description = validated_description(&description)?;
                open_store(&config, self.db)?.update_description(id, description)?;
                println!("Description updated successfully!");
            }
            Command::Delete { id } => {
                open_store(&config, self.db)?.delete(id)?;
                println!("Record deleted successfully!");
            }
            Command::Export { json, csv } => {
                let store = open_store(&config, self.db)?;
                let summary = export_all(&store, &json, &csv)?;
                println!(
                    "Exported {} records to {} and {}",
                    summary.records,
                    summary.json_path.display(),
                    summary.csv_path.display()
                );
            }
        }

        Ok(())
    }
}

fn open_store(config: &Config, db: Option<PathBuf>) -> anyhow::Result<WeatherStore> {
    let path = db.unwrap_or_else(|| config.database_path());
    Ok(WeatherStore::open(path)?)
}

/// Reject blank descriptions; anything else is stored exactly as typed.
fn validated_description(description: &str) -> anyhow::Result<&str> {
    if description.trim().is_empty() {
        bail!("Description must not be empty");
    }
    Ok(description)
}

fn configure(mut config: Config, api_key: Option<String>) -> anyhow::Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => inquire::Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_toggle_enabled()
            .prompt()
            .context("Failed to read API key")?,
    };

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn format_records(records: &[WeatherRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "ID: {} | {}\nLocation: {}\nTemp: {}°C\nDesc: {}",
                r.id, r.timestamp, r.location, r.temperature, r.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn history_defaults_to_five() {
        let cli = Cli::parse_from(["weatherlog", "history"]);
        assert!(matches!(cli.command, Command::History { limit: 5 }));
    }

    #[test]
    fn history_rejects_zero_limit() {
        assert!(Cli::try_parse_from(["weatherlog", "history", "-n", "0"]).is_err());
    }

    #[test]
    fn export_uses_default_file_names() {
        let cli = Cli::parse_from(["weatherlog", "export"]);
        match cli.command {
            Command::Export { json, csv } => {
                assert_eq!(json, PathBuf::from("weather_export.json"));
                assert_eq!(csv, PathBuf::from("weather_export.csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_db_flag_after_subcommand() {
        let cli = Cli::parse_from(["weatherlog", "delete", "3", "--db", "/tmp/h.db"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/h.db")));
        assert!(matches!(cli.command, Command::Delete { id: 3 }));
    }

    #[test]
    fn blank_descriptions_are_rejected() {
        for blank in ["", "   ", "\t\n"] {
            let err = validated_description(blank).unwrap_err();
            assert!(err.to_string().contains("must not be empty"), "{blank:?}");
        }
    }

    #[test]
    fn descriptions_are_kept_untrimmed() {
        assert_eq!(validated_description(" sunny ").unwrap(), " sunny ");
    }

    #[test]
    fn records_render_like_the_history_view() {
        let records = [WeatherRecord {
            id: 7,
            location: "Paris".into(),
            temperature: 22.5,
            description: "clear sky".into(),
            timestamp: "2024-06-01 12:00:00".into(),
        }];

        assert_eq!(
            format_records(&records),
            "ID: 7 | 2024-06-01 12:00:00\nLocation: Paris\nTemp: 22.5°C\nDesc: clear sky"
        );
    }
}
