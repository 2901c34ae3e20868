use std::sync::Arc;

use clap::{Parser, Subcommand};
use mesa::auth::StaticToken;
use mesa::catalog::{self, ALL_CATEGORIES, ExpressWindow};
use mesa::config::{ClientConfig, normalize_base_url};
use mesa::error::BookingError;
use mesa::flow::{BookingFlow, FlowUpdate};
use mesa::net::api::{HttpApi, ReservationApi};
use mesa::net::types::Id;
use mesa::state::session::ContactForm;
use mesa::state::submit::ReservationSubmitter;
use serde::Serialize;
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("no available table matches `{0}`")]
    NoTable(String),
    #[error("no tables available for this search")]
    NothingAvailable,
    #[error("event channel closed before availability arrived")]
    ChannelClosed,
}

#[derive(Parser, Debug)]
#[command(name = "mesa", about = "Restaurant table reservation client")]
struct Cli {
    #[arg(long, env = "MESA_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "MESA_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List restaurants, optionally filtered.
    Restaurants {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Show one restaurant with its table layout.
    Restaurant { restaurant_id: Id },
    /// Show which tables are free for a slot.
    Search {
        restaurant_id: Id,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long, default_value_t = 2)]
        guests: u32,
    },
    /// Find any restaurant with a free table now or tonight.
    Express {
        #[arg(long)]
        tonight: bool,
        #[arg(long, default_value_t = 2)]
        guests: u32,
    },
    /// Hold a table and reserve it.
    Book {
        restaurant_id: Id,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long, default_value_t = 2)]
        guests: u32,
        /// Table label (e.g. `A3`) or id; defaults to the first free table.
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "PE")]
        country: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List my reservations.
    Reservations,
    /// Cancel one of my reservations.
    Cancel { reservation_id: Id },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config.api_url = normalize_base_url(api_url);
    }
    if cli.token.is_some() {
        config.token = cli.token;
    }

    let api: Arc<dyn ReservationApi> = Arc::new(HttpApi::new(&config)?);
    let tokens = Arc::new(StaticToken::from(config.token.clone()));

    match cli.command {
        Command::Restaurants { query, category } => {
            let restaurants = api.list_restaurants().await?;
            print_json(&catalog::filter_restaurants(&restaurants, &query, &category))
        }
        Command::Restaurant { restaurant_id } => print_json(&api.fetch_restaurant(restaurant_id).await?),
        Command::Search { restaurant_id, date, time, guests } => {
            let mut flow = BookingFlow::new(api, tokens, config.hold_secs);
            flow.load_restaurant(restaurant_id).await?;
            flow.search(&date, &time, guests)?;
            await_availability(&mut flow).await?;
            for table in flow.session().tables() {
                let state = if table.is_selectable() { "free" } else { "taken" };
                println!("{}\t{}\t{} seats\t{state}", table.id, table.label, table.capacity);
            }
            Ok(())
        }
        Command::Express { tonight, guests } => {
            let window = if tonight { ExpressWindow::Tonight } else { ExpressWindow::Now };
            let matches = catalog::express_search(api.as_ref(), window, guests, local_now()).await?;
            print_json(&matches)
        }
        Command::Book { restaurant_id, date, time, guests, table, phone, country, notes } => {
            let mut flow = BookingFlow::new(api, tokens, config.hold_secs);
            flow.load_restaurant(restaurant_id).await?;
            flow.search(&date, &time, guests)?;
            await_availability(&mut flow).await?;

            let table_id = pick_table(&flow, table.as_deref())?;
            flow.select_table(table_id);
            flow.set_contact(ContactForm::new(phone, country).with_special_requests(notes));
            let confirmation = flow.submit().await?;
            flow.teardown();

            println!(
                "reserved table {} at {} on {} {} for {}",
                confirmation.table, confirmation.restaurant, confirmation.date, confirmation.time, confirmation.guests
            );
            println!("{}", confirmation.qr_payload().encode()?);
            Ok(())
        }
        Command::Reservations => {
            let submitter = ReservationSubmitter::new(api, tokens);
            for reservation in submitter.list().await? {
                println!(
                    "{}\t{}\t{} {}\t{}\t{}",
                    reservation.id,
                    reservation.restaurant_name.as_deref().unwrap_or("-"),
                    reservation.date,
                    reservation.short_time(),
                    reservation.table_number.as_deref().unwrap_or("-"),
                    reservation.status_label(),
                );
            }
            Ok(())
        }
        Command::Cancel { reservation_id } => {
            ReservationSubmitter::new(api, tokens).cancel(reservation_id).await?;
            println!("cancelled {reservation_id}");
            Ok(())
        }
    }
}

/// Pump flow events until the current search resolves.
async fn await_availability(flow: &mut BookingFlow) -> Result<(), CliError> {
    loop {
        match flow.next_event().await.ok_or(CliError::ChannelClosed)? {
            FlowUpdate::AvailabilityApplied { available, .. } => {
                tracing::debug!(available, "availability loaded");
                return Ok(());
            }
            FlowUpdate::AvailabilityFailed { error, .. } => return Err(error.into()),
            _ => {}
        }
    }
}

fn pick_table(flow: &BookingFlow, wanted: Option<&str>) -> Result<Id, CliError> {
    let tables = flow.session().tables();
    let mut free = tables.iter().filter(|t| t.is_selectable());
    match wanted {
        None => free.next().map(|t| t.id).ok_or(CliError::NothingAvailable),
        Some(wanted) => free
            .find(|t| t.label.eq_ignore_ascii_case(wanted) || t.id.to_string() == wanted)
            .map(|t| t.id)
            .ok_or_else(|| CliError::NoTable(wanted.to_owned())),
    }
}

fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    PrimitiveDateTime::new(now.date(), now.time())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
