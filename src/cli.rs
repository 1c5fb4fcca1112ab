use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{EventStatus, Field};
use crate::services::api::HttpEventApi;
use crate::services::credentials::{CredentialStore, FileCredentialStore};
use crate::services::form::{CreateEventForm, SubmitOutcome};

#[derive(Debug, Parser)]
#[command(name = "puk360-events", version, about = "Create events on the PUK360 backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the event form and submit it
    Create(CreateArgs),
    /// Store the bearer token used for event requests
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored bearer token
    Logout,
    /// Report whether a bearer token is stored
    Whoami,
}

/// Form inputs. Every field may be left empty; the form reports what is missing.
#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub location: String,

    /// Event date, YYYY-MM-DD
    #[arg(long, default_value = "", value_parser = parse_date)]
    pub date: String,

    /// Event time, HH:MM
    #[arg(long, default_value = "", value_parser = parse_time)]
    pub time: String,

    /// One of active, cancelled, completed
    #[arg(long, default_value = "active", value_parser = parse_status)]
    pub status: EventStatus,
}

fn parse_date(value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("expected a date like 2024-05-01, got {:?}", value))
}

fn parse_time(value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| format!("expected a time like 14:30, got {:?}", value))
}

fn parse_status(value: &str) -> Result<EventStatus, String> {
    EventStatus::try_from(value)
}

pub async fn run(cli: Cli, config: &Config) -> AppResult<()> {
    let store = FileCredentialStore::new(config.auth.token_file.clone());

    match cli.command {
        Command::Create(args) => create(args, config, store).await,
        Command::Login { token } => {
            if token.trim().is_empty() {
                return Err(AppError::Validation("Token must not be empty".to_string()));
            }
            store.store(&token)?;
            println!("Token stored in {}", store.path().display());
            Ok(())
        }
        Command::Logout => {
            store.clear()?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            if store.token().is_some() {
                println!("Logged in (token in {})", store.path().display());
            } else {
                println!("Not logged in");
            }
            Ok(())
        }
    }
}

async fn create(args: CreateArgs, config: &Config, store: FileCredentialStore) -> AppResult<()> {
    let transport = HttpEventApi::new(config)?;
    let form = CreateEventForm::from_config(config, Arc::new(store), Arc::new(transport))
        .on_event_created(|| println!("Returning to events"));

    fill_form(&form, &args)?;

    let outcome = form.submit().await;
    let state = form.state();
    match outcome {
        SubmitOutcome::Created => {
            if let Some(message) = &state.success {
                println!("{}", message);
            }
            form.settle().await;
            Ok(())
        }
        SubmitOutcome::Rejected(err) => Err(err.into()),
        SubmitOutcome::Ignored => Ok(()),
    }
}

fn fill_form(form: &CreateEventForm, args: &CreateArgs) -> AppResult<()> {
    form.set_field(Field::Title, args.title.as_str())?;
    form.set_field(Field::Description, args.description.as_str())?;
    form.set_field(Field::Location, args.location.as_str())?;
    form.set_field(Field::Date, args.date.as_str())?;
    form.set_field(Field::Time, args.time.as_str())?;
    form.set_field(Field::Status, args.status.name())
}
