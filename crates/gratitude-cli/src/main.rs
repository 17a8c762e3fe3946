//! Gratitude journal - command line client.
//!
//! Write a daily gratitude entry, list past entries and look up the entry
//! for any day. Sessions survive restarts and expired access tokens are
//! refreshed automatically.

mod app;
mod render;

use std::io;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gratitude_core::config::{Config, TokenStorage};
use gratitude_core::models::{split_list, EntryForm, DEFAULT_RATING};
use gratitude_core::ApiClient;

use app::App;

#[derive(Debug, Parser)]
#[command(name = "gratitude", version, about, long_about = None)]
struct Cli {
    /// API base URL (overrides the config file)
    #[arg(long, global = true, env = "GRATITUDE_API_URL")]
    api_url: Option<String>,

    /// Where to keep the session: file, keyring or memory
    #[arg(long, global = true)]
    storage: Option<TokenStorage>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in with a credential from the identity provider
    Login {
        /// Access token; prompted for when omitted
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        token: Option<String>,
        /// Refresh token used to renew the access token
        #[arg(long)]
        refresh_token: Option<String>,
    },
    /// Complete a browser sign-in from its callback URL
    Callback {
        /// The full callback URL, e.g. http://localhost:5173/oauth/callback?token=...
        url: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the API endpoint and sign-in state
    Status,
    /// List all entries
    List,
    /// Show one entry
    Show { id: String },
    /// Show the entry for a day (default: today)
    Day { date: Option<NaiveDate> },
    /// Write a new entry
    Add(AddArgs),
    /// Delete an entry
    Delete { id: String },
    /// Show the configured emotions and habits
    Values,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Day of the entry (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// What happened today
    #[arg(long)]
    story: String,
    /// How the day was, 1 to 10
    #[arg(long, default_value_t = DEFAULT_RATING)]
    rating: u8,
    /// Emotion felt today (repeatable)
    #[arg(long = "emotion")]
    emotions: Vec<String>,
    #[arg(long, default_value = "")]
    learnings: String,
    /// What you are grateful for
    #[arg(long, default_value = "")]
    gratitude: String,
    #[arg(long, default_value = "")]
    mistakes: String,
    /// Comma-separated people, e.g. "Sam, Alex"
    #[arg(long, default_value = "")]
    people: String,
    /// Good habit kept today (repeatable)
    #[arg(long = "good-habit")]
    good_habits: Vec<String>,
    /// Bad habit slipped into today (repeatable)
    #[arg(long = "bad-habit")]
    bad_habits: Vec<String>,
}

impl AddArgs {
    fn into_form(self) -> EntryForm {
        let mut form = match self.date {
            Some(date) => EntryForm::for_date(date),
            None => EntryForm::default(),
        };
        form.main_story = self.story;
        form.day_rating = self.rating;
        form.emotions = self.emotions;
        form.learnings = self.learnings;
        form.gratitude_list = self.gratitude;
        form.mistakes = self.mistakes;
        form.people_in_mind = split_list(&self.people);
        form.good_habits = self.good_habits;
        form.bad_habits = self.bad_habits;
        form
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn prompt_token() -> Result<String> {
    let token = rpassword::prompt_password("Access token: ").context("Failed to read token")?;
    let token = token.trim().to_string();
    if token.is_empty() {
        anyhow::bail!("No token entered");
    }
    Ok(token)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable config file");
        Config::default()
    });
    if let Some(url) = cli.api_url {
        config.api_url = Some(url);
    }
    if let Some(storage) = cli.storage {
        config.token_storage = storage;
    }

    let store = config.token_store()?;
    let client = ApiClient::from_config(&config, store)?;
    info!(api = client.base_url(), storage = %config.token_storage, "Gratitude journal starting");

    let mut app = App::new(client);
    let result = match cli.command {
        Command::Login { token, refresh_token } => {
            let token = match token {
                Some(token) => token,
                None => prompt_token()?,
            };
            app.login(&token, refresh_token)
        }
        Command::Callback { url } => app.oauth_callback(&url),
        Command::Logout => app.logout(),
        Command::Status => {
            app.status();
            Ok(())
        }
        Command::List => app.list().await,
        Command::Show { id } => app.show(&id).await,
        Command::Day { date } => app.day(date).await,
        Command::Add(args) => app.add(args.into_form()).await,
        Command::Delete { id } => app.delete(&id).await,
        Command::Values => app.values().await,
    };

    app.drain_session_events();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "gratitude",
            "add",
            "--date",
            "2024-03-01",
            "--story",
            "Walked by the river",
            "--rating",
            "8",
            "--emotion",
            "calm",
            "--emotion",
            "joy",
            "--people",
            "Sam, Alex",
        ])
        .expect("valid args");

        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        let form = args.into_form();
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"));
        assert_eq!(form.day_rating, 8);
        assert_eq!(form.emotions, vec!["calm", "joy"]);
        assert_eq!(form.people_in_mind, vec!["Sam", "Alex"]);
    }

    #[test]
    fn test_cli_add_defaults() {
        assert!(Cli::try_parse_from(["gratitude", "add"]).is_err());

        let cli = Cli::try_parse_from(["gratitude", "add", "--story", "Quiet day"])
            .expect("valid args");
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        let form = args.into_form();
        let mut expected = EntryForm::default();
        expected.main_story = "Quiet day".to_string();
        assert_eq!(form, expected);
    }

    #[test]
    fn test_cli_login_rejects_empty_token() {
        assert!(Cli::try_parse_from(["gratitude", "login", "--token", ""]).is_err());

        let cli = Cli::try_parse_from(["gratitude", "login", "--token", "abc"]).expect("valid args");
        let Command::Login { token, .. } = cli.command else {
            panic!("expected login command");
        };
        assert_eq!(token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_cli_storage_flag() {
        let cli = Cli::try_parse_from(["gratitude", "--storage", "memory", "status"])
            .expect("valid args");
        assert_eq!(cli.storage, Some(TokenStorage::Memory));
        assert!(Cli::try_parse_from(["gratitude", "--storage", "cloud", "status"]).is_err());
    }
}
