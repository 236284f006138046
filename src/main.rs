use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use tokio::signal::ctrl_c;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ramadan_countdown::prayer::{city_display_name, schedule_for_date};
use ramadan_countdown::{
    AnyCalendar, ApiClient, CountdownSession, DEFAULT_CITIES_URL, DEFAULT_CITY, DEFAULT_HADITH_BASE,
    DEFAULT_PRAYER_SCHEDULE_BASE, Endpoints, SystemClock, countdown_status, extract,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Hijri calendar used for the countdown (umm-al-qura or tabular)
    #[arg(long, env = "HIJRI_CALENDAR", default_value = "umm-al-qura")]
    calendar: AnyCalendar,

    #[arg(long, env = "CITIES_API_URL", default_value = DEFAULT_CITIES_URL)]
    cities_url: String,

    #[arg(long, env = "PRAYER_API_BASE", default_value = DEFAULT_PRAYER_SCHEDULE_BASE)]
    prayer_base: String,

    #[arg(long, env = "HADITH_API_BASE", default_value = DEFAULT_HADITH_BASE)]
    hadith_base: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count down to the next Ramadan, or to Eid al-Fitr during Ramadan
    Countdown {
        /// Print the current countdown and exit
        #[arg(long)]
        once: bool,
    },
    /// Today's prayer times for a city
    Prayer {
        #[arg(long, default_value = DEFAULT_CITY)]
        city: String,
    },
    /// List the available cities
    Cities,
    /// Show a random hadith
    Hadith,
}

impl Args {
    fn endpoints(&self) -> Endpoints {
        Endpoints {
            cities_url: self.cities_url.clone(),
            schedule_base: self.prayer_base.clone(),
            hadith_base: self.hadith_base.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    match &args.command {
        Command::Countdown { once } => countdown(args.calendar, *once).await,
        Command::Prayer { city } => prayer(&ApiClient::new(args.endpoints())?, city).await,
        Command::Cities => cities(&ApiClient::new(args.endpoints())?).await,
        Command::Hadith => hadith(&ApiClient::new(args.endpoints())?).await,
    }
}

async fn countdown(calendar: AnyCalendar, once: bool) -> Result<()> {
    let now = Local::now();
    println!("Today: {} ({calendar} calendar)", extract(&calendar, &now));

    if once {
        println!("{}", countdown_status(&calendar, &now));
        return Ok(());
    }

    let session = CountdownSession::start(calendar, SystemClock, Duration::from_secs(1));
    let mut updates = session.subscribe();
    println!("{}", session.current());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("countdown ended unexpectedly");
                    break;
                }
                println!("{}", *updates.borrow_and_update());
            }
            _ = ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    session.stop();
    Ok(())
}

async fn prayer(client: &ApiClient, city: &str) -> Result<()> {
    let now = Local::now().naive_local();
    let today = now.date();

    let month = client
        .monthly_schedule(city, today.year(), today.month())
        .await
        .with_context(|| format!("Failed to load the monthly prayer schedule for {city}"))?;

    println!("Prayer times for {} on {today}", city_display_name(city));

    let Some(day) = schedule_for_date(&month, today) else {
        println!("No prayer data found for {today}.");
        return Ok(());
    };

    let next = day.next_prayer(now.time());
    for (prayer, time) in day.entries() {
        let marker = if Some(prayer) == next { "  <- next" } else { "" };
        println!("  {:<14} {time}{marker}", prayer.to_string());
    }
    Ok(())
}

async fn cities(client: &ApiClient) -> Result<()> {
    let slugs = client
        .cities()
        .await
        .context("Failed to load the city list")?;

    println!("{} cities", slugs.len());
    for slug in &slugs {
        println!("  {slug:<28} {}", city_display_name(slug));
    }
    Ok(())
}

async fn hadith(client: &ApiClient) -> Result<()> {
    let selected = client
        .random_hadith()
        .await
        .context("Failed to load a hadith. Please try again later")?;

    println!("{selected}");
    Ok(())
}
