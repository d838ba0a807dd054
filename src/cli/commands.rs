use super::render;
use crate::api::NasaClient;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    parse_date, ApodSelection, EpicCollection, PhotoSelection, Rover, RoverPhotoQuery,
};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// CLI toolkit for NASA's open data APIs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// NASA API key (overrides NASA_API_KEY; defaults to DEMO_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Also write the JSON result to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Command to run; starts the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Astronomy Picture of the Day
    Apod(ApodArgs),

    /// Near-Earth asteroids by closest approach date
    Asteroids(AsteroidFeedArgs),

    /// Look up a single asteroid by its SPK-ID
    Asteroid(AsteroidLookupArgs),

    /// Mars rover photos
    Rover(RoverArgs),

    /// EPIC full-disc Earth imagery
    Epic(EpicArgs),
}

fn parse_date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_date("date", value).map_err(|e| e.to_string())
}

#[derive(Args, Debug, Clone, Default)]
pub struct ApodArgs {
    /// Date of the picture (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg, conflicts_with = "start_date")]
    pub date: Option<NaiveDate>,

    /// Start of a date range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub start_date: Option<NaiveDate>,

    /// End of a date range (YYYY-MM-DD; requires --start-date)
    #[arg(long, value_parser = parse_date_arg, requires = "start_date")]
    pub end_date: Option<NaiveDate>,

    /// Number of random pictures (1-100)
    #[arg(short, long, conflicts_with_all = ["date", "start_date"])]
    pub count: Option<u32>,

    /// Include thumbnail URLs for videos
    #[arg(long)]
    pub thumbs: bool,
}

impl ApodArgs {
    pub fn selection(&self) -> Result<ApodSelection> {
        ApodSelection::from_options(self.date, self.start_date, self.end_date, self.count)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AsteroidFeedArgs {
    /// First approach date (YYYY-MM-DD; default: today, UTC)
    #[arg(long, value_parser = parse_date_arg)]
    pub start_date: Option<NaiveDate>,

    /// Last approach date (YYYY-MM-DD; at most 7 days after the start)
    #[arg(long, value_parser = parse_date_arg)]
    pub end_date: Option<NaiveDate>,

    /// Only list potentially hazardous asteroids
    #[arg(long)]
    pub hazardous_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AsteroidLookupArgs {
    /// Asteroid SPK-ID (e.g. 3542519)
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct RoverArgs {
    /// Rover name
    #[arg(short, long, value_enum, default_value_t = Rover::Curiosity)]
    pub rover: Rover,

    /// Martian sol (days since landing)
    #[arg(long, conflicts_with = "earth_date")]
    pub sol: Option<u32>,

    /// Earth date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub earth_date: Option<NaiveDate>,

    /// Camera abbreviation (e.g. NAVCAM, FHAZ)
    #[arg(short, long)]
    pub camera: Option<String>,

    /// Result page (25 photos per page)
    #[arg(short, long)]
    pub page: Option<u32>,
}

impl RoverArgs {
    /// Without a sol or Earth date the latest photos are requested.
    pub fn to_query(&self) -> RoverPhotoQuery {
        let selection = match (self.sol, self.earth_date) {
            (Some(sol), _) => PhotoSelection::Sol(sol),
            (None, Some(date)) => PhotoSelection::EarthDate(date),
            (None, None) => PhotoSelection::Latest,
        };
        let mut query = RoverPhotoQuery::new(self.rover, selection);
        query.camera = self.camera.clone();
        query.page = self.page;
        query
    }
}

#[derive(Args, Debug, Clone)]
pub struct EpicArgs {
    /// Image collection
    #[arg(long, value_enum, default_value_t = EpicCollection::Natural)]
    pub collection: EpicCollection,

    /// Date of the images (YYYY-MM-DD; default: most recent)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

/// Where and how command results are written.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub save: Option<PathBuf>,
}

/// CLI application
pub struct App {
    api_client: NasaClient,
    output: OutputOptions,
}

impl App {
    /// Create a new CLI application
    pub fn new(config: &Config, output: OutputOptions) -> Result<Self> {
        let api_client = NasaClient::new(config)?;
        Ok(Self { api_client, output })
    }

    #[cfg(test)]
    fn with_client(api_client: NasaClient, output: OutputOptions) -> Self {
        Self { api_client, output }
    }

    /// Run a single command
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        debug!("Running command: {:?}", command);
        match command {
            Commands::Apod(args) => self.show_apod(&args).await,
            Commands::Asteroids(args) => self.show_asteroid_feed(&args).await,
            Commands::Asteroid(args) => self.show_asteroid(&args.id).await,
            Commands::Rover(args) => self.show_rover_photos(&args).await,
            Commands::Epic(args) => self.show_epic(&args).await,
        }
    }

    async fn show_apod(&self, args: &ApodArgs) -> Result<()> {
        let selection = args.selection()?;
        let apods = self
            .fetch(
                "Fetching Astronomy Picture of the Day...",
                self.api_client.get_apod(&selection, args.thumbs),
            )
            .await?;
        info!("Fetched {} APOD entries", apods.len());
        self.emit(&apods, || render::apod_report(&apods)).await
    }

    async fn show_asteroid_feed(&self, args: &AsteroidFeedArgs) -> Result<()> {
        let start = args.start_date.unwrap_or_else(|| Utc::now().date_naive());
        let feed = self
            .fetch(
                "Fetching near-Earth asteroids...",
                self.api_client.get_neo_feed(start, args.end_date),
            )
            .await?;
        let rows = feed.summaries(args.hazardous_only);
        info!(
            "Fetched {} near-Earth objects ({} listed)",
            feed.element_count,
            rows.len()
        );
        self.emit(&rows, || {
            render::asteroid_feed_report(&rows, feed.element_count, feed.hazardous_count())
        })
        .await
    }

    async fn show_asteroid(&self, id: &str) -> Result<()> {
        let neo = self
            .fetch("Looking up asteroid...", self.api_client.lookup_neo(id))
            .await?;
        self.emit(&neo, || render::asteroid_detail_report(&neo)).await
    }

    async fn show_rover_photos(&self, args: &RoverArgs) -> Result<()> {
        let query = args.to_query();
        let photos = self
            .fetch(
                &format!("Fetching {} photos...", query.rover),
                self.api_client.get_rover_photos(&query),
            )
            .await?;
        info!("Fetched {} photos from {}", photos.len(), query.rover);
        self.emit(&photos, || render::rover_photos_report(&photos))
            .await
    }

    async fn show_epic(&self, args: &EpicArgs) -> Result<()> {
        let images = self
            .fetch(
                "Fetching EPIC imagery...",
                self.api_client.get_epic_images(args.collection, args.date),
            )
            .await?;
        info!("Fetched {} EPIC images", images.len());
        self.emit(&images, || render::epic_report(&images, args.collection))
            .await
    }

    /// Awaits `request` behind a spinner.
    async fn fetch<T, F>(&self, message: &str, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = request.await;
        spinner.finish_and_clear();
        result
    }

    /// Prints the result (JSON or rendered tables) and saves it if requested.
    async fn emit<T, R>(&self, value: &T, render: R) -> Result<()>
    where
        T: Serialize,
        R: FnOnce() -> String,
    {
        if self.output.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", render());
        }

        if let Some(path) = &self.output.save {
            save_json(path, value).await?;
            // stderr keeps `--json` stdout parseable
            eprintln!("{} {}", "Saved results to".green(), path.display());
        }
        Ok(())
    }
}

/// Writes `value` as pretty JSON, creating parent directories as needed.
pub async fn save_json<T: Serialize>(path: &std::path::Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body).await.map_err(|e| {
        tracing::error!("Failed to write {}: {}", path.display(), e);
        AppError::from(e)
    })?;
    info!("Saved results to {}", path.display());
    Ok(())
}
