use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use std::sync::Arc;
use tracing::debug;
use weather_lookup_core::{Config, FetchMode, SearchSession, View, WeatherFetcher, WeatherQuery};

use crate::render::{SETUP_NOTICE, render_view};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Current weather by city name")]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "Tokyo".
        city: String,

        /// Print the record as JSON instead of a card.
        #[arg(long)]
        json: bool,
    },

    /// Search cities interactively until an empty input or Esc.
    Search,

    /// Configure the weather API base URL, key and demo mode.
    Configure,

    /// Show where the config lives and which mode is active.
    Status,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city, json } => show(&city, json).await,
            Command::Search => search_loop().await,
            Command::Configure => configure(),
            Command::Status => status(),
        }
    }
}

fn session_from_config() -> anyhow::Result<SearchSession> {
    let config = Config::load()?;
    if config.needs_setup_notice() {
        eprintln!("{SETUP_NOTICE}\n");
    }

    let fetcher = WeatherFetcher::from_config(&config);
    debug!(mode = ?fetcher.mode(), "weather fetcher ready");
    Ok(SearchSession::new(Arc::new(fetcher)))
}

async fn show(city: &str, json: bool) -> anyhow::Result<()> {
    let query = WeatherQuery::parse(city)?;
    let session = session_from_config()?;

    eprintln!("{}", render_view(&View::Loading));
    session.search(&query.city).await;

    match session.view() {
        View::Weather(record) if json => {
            let out = serde_json::to_string_pretty(&record)
                .context("Failed to serialize weather record")?;
            println!("{out}");
            Ok(())
        }
        View::Error(message) => Err(anyhow!("Unable to load weather. {message}")),
        view => {
            println!("{}", render_view(&view));
            Ok(())
        }
    }
}

async fn search_loop() -> anyhow::Result<()> {
    let session = session_from_config()?;
    println!("{}", render_view(&session.view()));

    loop {
        let input = Text::new("City:")
            .with_placeholder("e.g., London, Tokyo")
            .with_help_message("Press Enter to search. Leave empty or press Esc to quit.")
            .prompt();

        let city = match input {
            Ok(city) if city.trim().is_empty() => break,
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        println!("{}", render_view(&View::Loading));
        session.search(&city).await;
        println!("{}\n", render_view(&session.view()));
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let default_base = if config.base_url.is_empty() {
        DEFAULT_BASE_URL
    } else {
        config.base_url.as_str()
    };
    let base_url = Text::new("API base URL:")
        .with_default(default_base)
        .prompt()
        .context("Failed to read base URL")?;

    let api_key = Password::new("API key (leave empty to keep the current one):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let demo_mode = Confirm::new("Force demo mode?")
        .with_default(config.demo_mode)
        .prompt()
        .context("Failed to read demo mode choice")?;

    config.base_url = base_url.trim().to_string();
    if !api_key.trim().is_empty() {
        config.api_key = api_key.trim().to_string();
    }
    config.demo_mode = demo_mode;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn status() -> anyhow::Result<()> {
    let config = Config::load()?;

    println!("Config file: {}", Config::config_file_path()?.display());
    match config.fetch_mode() {
        FetchMode::Live => println!("Mode: live ({})", config.base_url),
        FetchMode::Demo(reason) => println!("Mode: demo. {}", reason.message()),
    }
    if config.needs_setup_notice() {
        println!("\n{SETUP_NOTICE}");
    }

    Ok(())
}
