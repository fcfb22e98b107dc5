//! EC2 reserved instances CLI
//!
//! Lists reserved instances, summarizes them in normalized units and
//! optionally schedules their expirations in a Google calendar.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use commands::{calendar, inventory};
use reservation_lib::calendar::{GoogleCalendarClient, SyncReport};
use reservation_lib::inventory::{AwsCliInventory, InventoryFilter, InventorySource, JsonFileInventory};
use reservation_lib::{NormalizedTotals, ReservationState, SizeWeights};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;
use crate::output::OutputFormat;

/// Show reserved EC2 instances
#[derive(Parser)]
#[command(name = "ec2-reserved")]
#[command(author, version, about = "Show reserved EC2 instances", long_about = None)]
pub struct Cli {
    /// Filter result by reservation state
    #[arg(long, short, value_enum)]
    pub state: Option<StateArg>,

    /// Filter result by instance type (substring match)
    #[arg(long = "type", short = 't')]
    pub instance_type: Option<String>,

    /// Create events in your Google Calendar using the expiration dates of
    /// your active reservations (ignores --state and --type)
    #[arg(long)]
    pub create_google_calendar_events: bool,

    /// Read a saved describe-reserved-instances JSON listing ("-" for stdin)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// AWS region passed to the AWS CLI
    #[arg(long)]
    pub region: Option<String>,

    /// AWS profile passed to the AWS CLI
    #[arg(long)]
    pub profile: Option<String>,

    /// Display name of the calendar receiving events
    #[arg(long)]
    pub calendar: Option<String>,

    /// OAuth access token for the Google Calendar API
    #[arg(long, env = "GOOGLE_CALENDAR_TOKEN", hide_env_values = true)]
    pub google_token: Option<String>,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

/// Reservation states accepted by --state
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateArg {
    PaymentPending,
    Active,
    PaymentFailed,
    Retired,
}

impl From<StateArg> for ReservationState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::PaymentPending => ReservationState::PaymentPending,
            StateArg::Active => ReservationState::Active,
            StateArg::PaymentFailed => ReservationState::PaymentFailed,
            StateArg::Retired => ReservationState::Retired,
        }
    }
}

/// Combined JSON document
#[derive(Serialize)]
struct JsonOutput<'a> {
    reservations: Vec<inventory::ReservationView<'a>>,
    totals: &'a NormalizedTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    calendar_sync: Option<SyncReport>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let app_config = AppConfig::load(cli.config.as_deref())?;

    let filter = InventoryFilter::resolve(
        cli.state.map(Into::into),
        cli.instance_type.clone(),
        cli.create_google_calendar_events,
    );
    info!(filter = ?filter, "Listing reserved instances");

    let source: Box<dyn InventorySource> = match &cli.input {
        Some(path) => Box::new(JsonFileInventory::new(path)),
        None => Box::new(
            AwsCliInventory::new(app_config.aws_program.clone())
                .with_region(cli.region.clone().or(app_config.aws_region.clone()))
                .with_profile(cli.profile.clone().or(app_config.aws_profile.clone())),
        ),
    };

    let records = source
        .list_reservations(&filter)
        .await
        .context("Failed to list reserved instances")?;

    let now = Utc::now();
    let weights = SizeWeights::standard();

    if let OutputFormat::Table = cli.format {
        inventory::print_reservations(&records, now);
    }

    let totals = inventory::compute_totals(&records, &weights, now)?;

    if let OutputFormat::Table = cli.format {
        inventory::print_summary(&totals, &weights);
    }

    let calendar_name = cli
        .calendar
        .clone()
        .unwrap_or_else(|| app_config.calendar_name.clone());

    let sync_report = if cli.create_google_calendar_events {
        let token = cli
            .google_token
            .clone()
            .or(app_config.google_access_token.clone())
            .context("A Google access token is required (--google-token or GOOGLE_CALENDAR_TOKEN)")?;
        let client = GoogleCalendarClient::new(&app_config.google_api_url, token)?;

        let report = calendar::sync_calendar(&client, &calendar_name, &records, now).await?;
        if let OutputFormat::Table = cli.format {
            calendar::print_sync_report(&report, &calendar_name);
        }
        Some(report)
    } else {
        None
    };

    if let OutputFormat::Json = cli.format {
        let output = JsonOutput {
            reservations: records
                .iter()
                .map(|r| inventory::ReservationView::new(r, now))
                .collect(),
            totals: &totals,
            calendar_sync: sync_report.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    if let Some(report) = &sync_report {
        calendar::ensure_complete(report)?;
    }

    Ok(())
}
