//! Earth Polychromatic Imaging Camera (EPIC) image metadata.

use crate::error::{AppError, Result};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public image archive; unlike the metadata API it needs no key.
pub const EPIC_ARCHIVE_URL: &str = "https://epic.gsfc.nasa.gov/archive";

const EPIC_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EpicCollection {
    /// True-color imagery.
    Natural,
    /// Color-corrected imagery.
    Enhanced,
}

impl EpicCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpicCollection::Natural => "natural",
            EpicCollection::Enhanced => "enhanced",
        }
    }
}

impl fmt::Display for EpicCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry from `/EPIC/api/{collection}[/date/{date}]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EpicImage {
    pub identifier: String,
    #[serde(default)]
    pub caption: String,
    /// Archive file name without extension, e.g. `epic_1b_20151031003633`.
    pub image: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Acquisition time, `YYYY-MM-DD HH:MM:SS` (UTC).
    pub date: String,
    #[serde(default)]
    pub centroid_coordinates: Option<CentroidCoordinates>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CentroidCoordinates {
    pub lat: f64,
    pub lon: f64,
}

impl EpicImage {
    pub fn acquired_at(&self) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.date.trim(), EPIC_DATETIME_FORMAT).map_err(|e| {
            AppError::Cli(format!(
                "EPIC image {} has an unexpected date '{}': {}",
                self.identifier, self.date, e
            ))
        })
    }

    /// Full-resolution PNG location in the public archive.
    pub fn archive_url(&self, collection: EpicCollection) -> Result<String> {
        let taken = self.acquired_at()?;
        Ok(format!(
            "{}/{}/{}/png/{}.png",
            EPIC_ARCHIVE_URL,
            collection,
            taken.format("%Y/%m/%d"),
            self.image
        ))
    }
}
