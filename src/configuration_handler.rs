use crate::{configuration::Configuration, countdown::PAYMENT_WINDOW, types::SlotId};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::{fs, io, path::Path, path::PathBuf, time::Duration};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Parser)]
#[command(name = "venue_booking", about = "Book venue slots and register for tournaments")]
pub struct ConfigurationHandler {
    /// Base URL of the booking website
    #[arg(long, env = "BOOKING_API_URL", default_value = "http://127.0.0.1:5000")]
    api_url: String,

    /// Fixed user identifier, overrides the identity file
    #[arg(long, env = "BOOKING_USER_ID")]
    user_id: Option<String>,

    /// Where the generated user identifier is kept between runs
    #[arg(long, env = "BOOKING_IDENTITY_FILE", default_value = ".booking_user_id")]
    identity_file: PathBuf,

    #[arg(long, env = "BOOKING_PAYMENT_WINDOW_SECS", default_value_t = PAYMENT_WINDOW.as_secs())]
    payment_window_secs: u64,

    #[command(subcommand)]
    command: Command,

    #[arg(skip)]
    resolved_user_id: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the slots of a date
    Slots {
        #[arg(long)]
        date: NaiveDate,
    },
    /// Lock a slot range, pay and submit the booking
    Book(BookArgs),
    /// List upcoming tournaments
    Tournaments,
    /// Register a team for a tournament
    Register {
        #[arg(long)]
        tournament_id: u32,
        #[arg(long)]
        team_name: String,
        #[arg(long)]
        captain_name: String,
        #[arg(long)]
        captain_phone: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct BookArgs {
    #[arg(long)]
    pub date: NaiveDate,
    /// First slot id of the range
    #[arg(long)]
    pub start: SlotId,
    /// Last slot id of the range (inclusive), defaults to the start slot
    #[arg(long)]
    pub end: Option<SlotId>,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: String,
    /// PNG or JPEG screenshot of the payment, at most 2MB
    #[arg(long)]
    pub screenshot: PathBuf,
    /// Amount paid, defaults to the quoted price
    #[arg(long)]
    pub paid_amount: Option<u32>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            info!(?err, "No .env file loaded");
        }
        Self::parse().resolve_user()
    }

    fn resolve_user(mut self) -> Self {
        self.resolved_user_id = match self.user_id.clone() {
            Some(user_id) => user_id,
            None => load_or_create_identifier(&self.identity_file),
        };
        self
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

impl Configuration for ConfigurationHandler {
    fn api_url(&self) -> String {
        self.api_url.clone()
    }

    fn user_identifier(&self) -> String {
        self.resolved_user_id.clone()
    }

    fn payment_window(&self) -> Duration {
        Duration::from_secs(self.payment_window_secs)
    }
}

pub fn generate_user_identifier() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("user_{}_{}", Utc::now().timestamp_millis(), &random[..9])
}

/// Reuses the identifier stored at `path`, creating it on first use.
pub fn load_or_create_identifier(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(stored) if !stored.trim().is_empty() => return stored.trim().to_string(),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(?err, ?path, "Failed to read identity file"),
    }

    let user_id = generate_user_identifier();
    if let Err(err) = fs::write(path, &user_id) {
        warn!(?err, ?path, "Failed to persist user identifier");
    }
    user_id
}
