use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::{path::PathBuf, process::ExitCode};
use weather_core::{Config, Profile, TOOL_NAME, WeatherTool};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "openweather-mcp", version, about = "OpenWeather day summaries as an MCP tool")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Deployment profile: "plain" or "decorated".
    #[arg(long, global = true, value_parser = parse_profile)]
    pub profile: Option<Profile>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the weather tool over MCP on stdin/stdout (default).
    Serve,

    /// Store the OpenWeather API key in the config file.
    Configure {
        /// Key to store; prompts when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Run one lookup and print the tool's answer.
    Fetch {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// YYYY-MM-DD; today (UTC) when absent.
        #[arg(long)]
        date: Option<String>,

        /// metric, imperial or kelvin.
        #[arg(long)]
        units: Option<String>,

        /// markdown or json.
        #[arg(long)]
        format: Option<String>,
    },

    /// Print the tool's input JSON schema.
    Schema,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let Cli { config, profile, command } = self;
        let path = match config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match command.unwrap_or(Command::Serve) {
            Command::Serve => {
                let tool = build_tool(&path, profile)?;
                server::serve(tool).await?;
            }
            Command::Configure { api_key } => {
                let api_key = match api_key {
                    Some(key) => key,
                    None => inquire::Password::new("OpenWeather API key:")
                        .without_confirmation()
                        .prompt()
                        .context("Failed to read API key")?,
                };

                let mut cfg = Config::load_file(&path)?;
                cfg.set_api_key(api_key.trim().to_string());
                if let Some(profile) = profile {
                    cfg.profile = profile;
                }
                cfg.save_to(&path)?;

                println!("Saved configuration to {}", path.display());
            }
            Command::Fetch { lat, lon, date, units, format } => {
                let tool = build_tool(&path, profile)?;
                let date = date.unwrap_or_else(|| {
                    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
                });

                let mut args = Map::new();
                args.insert("latitude".into(), lat.into());
                args.insert("longitude".into(), lon.into());
                args.insert("date".into(), date.into());
                if let Some(units) = units {
                    args.insert("units".into(), units.into());
                }
                if let Some(format) = format {
                    args.insert("response_format".into(), format.into());
                }

                let res = tool.call(TOOL_NAME, &Value::Object(args)).await?;
                println!("{}", res.text);

                if res.is_error {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Command::Schema => {
                println!("{}", serde_json::to_string_pretty(&WeatherTool::input_schema())?);
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn build_tool(path: &std::path::Path, profile: Option<Profile>) -> anyhow::Result<WeatherTool> {
    let mut cfg = Config::load_from(path)?;
    if let Some(profile) = profile {
        cfg.profile = profile;
    }

    WeatherTool::from_config(&cfg)
}

fn parse_profile(value: &str) -> Result<Profile, String> {
    Profile::try_from(value).map_err(|e| e.to_string())
}
