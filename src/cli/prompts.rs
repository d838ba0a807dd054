//! Interactive prompts used by the menu-driven mode.
//!
//! Each prompt collects the same arguments the matching subcommand takes, so
//! both modes share one execution path.

use super::{ApodArgs, AsteroidFeedArgs, AsteroidLookupArgs, EpicArgs, RoverArgs};
use crate::error::Result;
use crate::models::{parse_date, validate_asteroid_id, EpicCollection, Rover, APOD_MAX_COUNT};
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect, Input, Select};

/// Asks for a `YYYY-MM-DD` date; an empty answer yields `None`.
fn prompt_optional_date(prompt: &str) -> Result<Option<NaiveDate>> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{} (YYYY-MM-DD, blank to skip)", prompt))
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if input.trim().is_empty() {
                return Ok(());
            }
            parse_date("date", input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;

    if raw.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(parse_date("date", &raw)?))
    }
}

fn prompt_required_date(prompt: &str) -> Result<NaiveDate> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{} (YYYY-MM-DD)", prompt))
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            parse_date("date", input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    parse_date("date", &raw)
}

pub fn prompt_apod() -> Result<ApodArgs> {
    let modes = &["Today", "Specific date", "Date range", "Random selection"];
    let mode = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which pictures?")
        .items(modes)
        .default(0)
        .interact()?;

    let mut args = ApodArgs::default();
    match mode {
        1 => args.date = Some(prompt_required_date("Date")?),
        2 => {
            args.start_date = Some(prompt_required_date("Start date")?);
            args.end_date = prompt_optional_date("End date")?;
        },
        3 => {
            let count: u32 = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("How many (1-{})?", APOD_MAX_COUNT))
                .default(5)
                .validate_with(|n: &u32| -> std::result::Result<(), String> {
                    if (1..=APOD_MAX_COUNT).contains(n) {
                        Ok(())
                    } else {
                        Err(format!("Enter a number between 1 and {}", APOD_MAX_COUNT))
                    }
                })
                .interact_text()?;
            args.count = Some(count);
        },
        _ => {},
    }

    args.thumbs = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Include video thumbnails?")
        .default(false)
        .interact()?;
    Ok(args)
}

pub fn prompt_asteroid_feed() -> Result<AsteroidFeedArgs> {
    let start_date = prompt_optional_date("Start date (blank for today)")?;
    let end_date = prompt_optional_date("End date (at most 7 days later)")?;
    let hazardous_only = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Only potentially hazardous asteroids?")
        .default(false)
        .interact()?;
    Ok(AsteroidFeedArgs {
        start_date,
        end_date,
        hazardous_only,
    })
}

pub fn prompt_asteroid_lookup() -> Result<AsteroidLookupArgs> {
    let id: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Asteroid SPK-ID (e.g. 3542519)")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            validate_asteroid_id(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(AsteroidLookupArgs { id })
}

pub fn prompt_rover() -> Result<RoverArgs> {
    let theme = ColorfulTheme::default();
    let rover_index = Select::with_theme(&theme)
        .with_prompt("Which rover?")
        .items(&Rover::ALL)
        .default(0)
        .interact()?;
    let rover = Rover::ALL[rover_index];

    let modes = &["Latest photos", "By sol", "By Earth date"];
    let mode = Select::with_theme(&theme)
        .with_prompt("Which photos?")
        .items(modes)
        .default(0)
        .interact()?;

    let mut sol = None;
    let mut earth_date = None;
    match mode {
        1 => {
            let value: u32 = Input::with_theme(&theme)
                .with_prompt("Sol")
                .default(1000)
                .interact_text()?;
            sol = Some(value);
        },
        2 => earth_date = Some(prompt_required_date("Earth date")?),
        _ => {},
    }

    let mut cameras = vec!["Any camera"];
    cameras.extend_from_slice(rover.cameras());
    let camera_index = FuzzySelect::with_theme(&theme)
        .with_prompt("Camera")
        .items(&cameras)
        .default(0)
        .interact()?;
    let camera = (camera_index > 0).then(|| cameras[camera_index].to_string());

    Ok(RoverArgs {
        rover,
        sol,
        earth_date,
        camera,
        page: None,
    })
}

pub fn prompt_epic() -> Result<EpicArgs> {
    let collections = [EpicCollection::Natural, EpicCollection::Enhanced];
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which collection?")
        .items(&collections)
        .default(0)
        .interact()?;
    let date = prompt_optional_date("Date (blank for most recent)")?;
    Ok(EpicArgs {
        collection: collections[index],
        date,
    })
}
