//! Mars Rover Photos (`/mars-photos/api/v1`) payloads and query types.

use super::DATE_FORMAT;
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rovers served by the photo API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rover {
    Curiosity,
    Opportunity,
    Spirit,
    Perseverance,
}

impl Rover {
    pub const ALL: [Rover; 4] = [
        Rover::Curiosity,
        Rover::Opportunity,
        Rover::Spirit,
        Rover::Perseverance,
    ];

    /// Path segment used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rover::Curiosity => "curiosity",
            Rover::Opportunity => "opportunity",
            Rover::Spirit => "spirit",
            Rover::Perseverance => "perseverance",
        }
    }

    pub fn landing_date(&self) -> NaiveDate {
        let (y, m, d) = match self {
            Rover::Curiosity => (2012, 8, 6),
            Rover::Opportunity => (2004, 1, 25),
            Rover::Spirit => (2004, 1, 4),
            Rover::Perseverance => (2021, 2, 18),
        };
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    /// Camera abbreviations accepted by the `camera` filter for this rover.
    pub fn cameras(&self) -> &'static [&'static str] {
        match self {
            Rover::Curiosity => &[
                "FHAZ", "RHAZ", "MAST", "CHEMCAM", "MAHLI", "MARDI", "NAVCAM",
            ],
            Rover::Opportunity | Rover::Spirit => &["FHAZ", "RHAZ", "NAVCAM", "PANCAM", "MINITES"],
            Rover::Perseverance => &[
                "EDL_RUCAM",
                "EDL_RDCAM",
                "EDL_DDCAM",
                "EDL_PUCAM1",
                "EDL_PUCAM2",
                "NAVCAM_LEFT",
                "NAVCAM_RIGHT",
                "MCZ_RIGHT",
                "MCZ_LEFT",
                "FRONT_HAZCAM_LEFT_A",
                "FRONT_HAZCAM_RIGHT_A",
                "REAR_HAZCAM_LEFT",
                "REAR_HAZCAM_RIGHT",
                "SKYCAM",
                "SHERLOC_WATSON",
                "SUPERCAM_RMI",
                "LCAM",
            ],
        }
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which photos to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSelection {
    /// Martian solar day counted from landing.
    Sol(u32),
    EarthDate(NaiveDate),
    /// The most recent sol with photos.
    Latest,
}

/// A validated-on-demand rover photo request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoverPhotoQuery {
    pub rover: Rover,
    pub selection: PhotoSelection,
    pub camera: Option<String>,
    pub page: Option<u32>,
}

impl RoverPhotoQuery {
    pub fn new(rover: Rover, selection: PhotoSelection) -> Self {
        Self {
            rover,
            selection,
            camera: None,
            page: None,
        }
    }

    /// Normalizes the camera to upper case and checks the query against the rover.
    pub fn validate(&mut self) -> Result<()> {
        if let Some(camera) = self.camera.take() {
            let camera = camera.trim().to_ascii_uppercase();
            if !camera.is_empty() {
                if !self.rover.cameras().contains(&camera.as_str()) {
                    return Err(AppError::Cli(format!(
                        "Camera '{}' is not available on {}. Must be one of: {:?}",
                        camera,
                        self.rover,
                        self.rover.cameras()
                    )));
                }
                self.camera = Some(camera);
            }
        }

        if let PhotoSelection::EarthDate(date) = self.selection {
            let landed = self.rover.landing_date();
            if date < landed {
                return Err(AppError::Cli(format!(
                    "{} landed on {}; no photos exist for {}",
                    self.rover,
                    landed.format(DATE_FORMAT),
                    date.format(DATE_FORMAT)
                )));
            }
        }

        if self.page == Some(0) {
            return Err(AppError::Cli("Page numbers start at 1".to_string()));
        }

        Ok(())
    }

    /// Path below the API root, e.g. `/mars-photos/api/v1/rovers/curiosity/photos`.
    pub fn path(&self) -> String {
        let endpoint = match self.selection {
            PhotoSelection::Latest => "latest_photos",
            _ => "photos",
        };
        format!("/mars-photos/api/v1/rovers/{}/{}", self.rover, endpoint)
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = match self.selection {
            PhotoSelection::Sol(sol) => vec![("sol", sol.to_string())],
            PhotoSelection::EarthDate(date) => {
                vec![("earth_date", date.format(DATE_FORMAT).to_string())]
            },
            PhotoSelection::Latest => vec![],
        };
        if let Some(camera) = &self.camera {
            params.push(("camera", camera.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

// --- Response payloads ---

/// Response of `/rovers/{rover}/photos`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarsPhotosResponse {
    pub photos: Vec<MarsPhoto>,
}

/// Response of `/rovers/{rover}/latest_photos`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LatestPhotosResponse {
    pub latest_photos: Vec<MarsPhoto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarsPhoto {
    pub id: u64,
    pub sol: u32,
    pub camera: Camera,
    pub img_src: String,
    pub earth_date: String,
    pub rover: RoverInfo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Camera {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub rover_id: Option<u32>,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoverInfo {
    pub id: u32,
    pub name: String,
    pub landing_date: String,
    pub launch_date: String,
    pub status: String,
}
