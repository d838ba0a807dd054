//! Astronomy Picture of the Day (`/planetary/apod`) payloads and query selection.

use super::DATE_FORMAT;
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of random entries the APOD service hands out per request.
pub const APOD_MAX_COUNT: u32 = 100;

/// Date of the very first APOD.
pub fn apod_first_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1995, 6, 16).unwrap_or_default()
}

// --- Raw API payload ---

/// A single APOD entry exactly as the service returns it. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApodRecord {
    pub title: Option<String>,
    pub explanation: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
    pub hdurl: Option<String>,
    pub thumbnail_url: Option<String>,
    pub copyright: Option<String>,
    pub media_type: Option<String>,
    pub service_version: Option<String>,
}

/// The APOD endpoint returns an object for single-date queries and an array
/// for `count` and date-range queries.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApodPayload {
    Many(Vec<ApodRecord>),
    One(ApodRecord),
}

impl ApodPayload {
    pub fn into_records(self) -> Vec<ApodRecord> {
        match self {
            ApodPayload::Many(records) => records,
            ApodPayload::One(record) => vec![record],
        }
    }
}

// --- Domain types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("image") => MediaKind::Image,
            Some("video") => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// A normalized Astronomy Picture of the Day.
///
/// `hd_url` is only populated for images and `video_thumbnail_url` only for videos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Apod {
    pub title: String,
    pub explanation: String,
    pub date: String,
    pub media_type: MediaKind,
    pub url: String,
    pub hd_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub copyright: Option<String>,
}

impl From<ApodRecord> for Apod {
    fn from(record: ApodRecord) -> Self {
        let media_type = MediaKind::from_raw(record.media_type.as_deref());
        Self {
            title: record.title.unwrap_or_else(|| "Untitled".to_string()),
            explanation: record.explanation.unwrap_or_default(),
            date: record.date.unwrap_or_default(),
            url: record.url.unwrap_or_default(),
            hd_url: record.hdurl.filter(|_| media_type == MediaKind::Image),
            video_thumbnail_url: record
                .thumbnail_url
                .filter(|_| media_type == MediaKind::Video),
            // Credits frequently arrive wrapped in stray newlines.
            copyright: record
                .copyright
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            media_type,
        }
    }
}

// --- Query selection ---

/// Which APOD entries to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApodSelection {
    /// Today's picture (the service default).
    Today,
    Date(NaiveDate),
    /// Inclusive range; an open end means "up to today".
    Range {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
    /// `count` randomly chosen entries.
    Random(u32),
}

impl ApodSelection {
    /// Builds a selection from loose options.
    ///
    /// Precedence is `count`, then `date`, then `start_date`. An `end_date`
    /// without a `start_date` is rejected rather than silently dropped.
    pub fn from_options(
        date: Option<NaiveDate>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        count: Option<u32>,
    ) -> Result<Self> {
        let selection = if let Some(count) = count {
            ApodSelection::Random(count)
        } else if let Some(date) = date {
            ApodSelection::Date(date)
        } else if let Some(start) = start_date {
            ApodSelection::Range {
                start,
                end: end_date,
            }
        } else if end_date.is_some() {
            return Err(AppError::Cli(
                "An APOD end date requires a start date".to_string(),
            ));
        } else {
            ApodSelection::Today
        };

        selection.validate()?;
        Ok(selection)
    }

    /// Checks the selection against the archive's limits.
    pub fn validate(&self) -> Result<()> {
        let first = apod_first_date();
        let check_date = |label: &str, d: NaiveDate| {
            if d < first {
                Err(AppError::Cli(format!(
                    "APOD {} {} is before the first APOD ({})",
                    label,
                    d.format(DATE_FORMAT),
                    first.format(DATE_FORMAT)
                )))
            } else {
                Ok(())
            }
        };

        match *self {
            ApodSelection::Today => Ok(()),
            ApodSelection::Date(d) => check_date("date", d),
            ApodSelection::Range { start, end } => {
                check_date("start date", start)?;
                if let Some(end) = end {
                    check_date("end date", end)?;
                    if end < start {
                        return Err(AppError::Cli(format!(
                            "APOD end date {} is before start date {}",
                            end.format(DATE_FORMAT),
                            start.format(DATE_FORMAT)
                        )));
                    }
                }
                Ok(())
            },
            ApodSelection::Random(count) => {
                if (1..=APOD_MAX_COUNT).contains(&count) {
                    Ok(())
                } else {
                    Err(AppError::Cli(format!(
                        "APOD count must be between 1 and {}, got {}",
                        APOD_MAX_COUNT, count
                    )))
                }
            },
        }
    }

    /// Selection-specific query parameters (`api_key` and `thumbs` are added by the client).
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match *self {
            ApodSelection::Today => vec![],
            ApodSelection::Date(d) => vec![("date", d.format(DATE_FORMAT).to_string())],
            ApodSelection::Range { start, end } => {
                let mut params = vec![("start_date", start.format(DATE_FORMAT).to_string())];
                if let Some(end) = end {
                    params.push(("end_date", end.format(DATE_FORMAT).to_string()));
                }
                params
            },
            ApodSelection::Random(count) => vec![("count", count.to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_image_record_keeps_hd_url_and_drops_thumbnail() {
        let record = ApodRecord {
            title: Some("Pillars of Creation".to_string()),
            explanation: Some("Columns of gas and dust.".to_string()),
            date: Some("2026-01-18".to_string()),
            url: Some("https://apod.nasa.gov/image.jpg".to_string()),
            hdurl: Some("https://apod.nasa.gov/image_hd.jpg".to_string()),
            thumbnail_url: Some("https://apod.nasa.gov/thumb.jpg".to_string()),
            copyright: Some("\nJane Doe\n".to_string()),
            media_type: Some("image".to_string()),
            service_version: Some("v1".to_string()),
        };
        let apod = Apod::from(record);
        assert_eq!(apod.media_type, MediaKind::Image);
        assert_eq!(apod.hd_url.as_deref(), Some("https://apod.nasa.gov/image_hd.jpg"));
        assert_eq!(apod.video_thumbnail_url, None);
        assert_eq!(apod.copyright.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_video_record_keeps_thumbnail_and_drops_hd_url() {
        let record = ApodRecord {
            url: Some("https://youtube.com/embed/xyz".to_string()),
            hdurl: Some("https://should.not/appear".to_string()),
            thumbnail_url: Some("https://img.youtube.com/xyz.jpg".to_string()),
            media_type: Some("video".to_string()),
            ..Default::default()
        };
        let apod = Apod::from(record);
        assert_eq!(apod.media_type, MediaKind::Video);
        assert_eq!(apod.hd_url, None);
        assert_eq!(
            apod.video_thumbnail_url.as_deref(),
            Some("https://img.youtube.com/xyz.jpg")
        );
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let apod = Apod::from(ApodRecord {
            copyright: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(apod.title, "Untitled");
        assert_eq!(apod.explanation, "");
        assert_eq!(apod.url, "");
        assert_eq!(apod.media_type, MediaKind::Other);
        assert_eq!(apod.copyright, None);
    }

    #[test]
    fn test_payload_accepts_object_or_array() {
        let one: ApodPayload =
            serde_json::from_str(r#"{"title":"One","service_version":"v1"}"#).unwrap();
        let records = one.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].service_version.as_deref(), Some("v1"));

        let many: ApodPayload =
            serde_json::from_str(r#"[{"title":"A"},{"title":"B"},{"title":"C"}]"#).unwrap();
        let records = many.into_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].title.as_deref(), Some("C"));
    }

    #[rstest]
    #[case(None, None, None, None, ApodSelection::Today)]
    #[case(Some(d(2020, 1, 1)), None, None, None, ApodSelection::Date(d(2020, 1, 1)))]
    #[case(Some(d(2020, 1, 1)), Some(d(2019, 1, 1)), None, Some(3), ApodSelection::Random(3))]
    #[case(Some(d(2020, 1, 1)), Some(d(2019, 1, 1)), Some(d(2019, 1, 5)), None, ApodSelection::Date(d(2020, 1, 1)))]
    #[case(None, Some(d(2019, 1, 1)), Some(d(2019, 1, 5)), None, ApodSelection::Range { start: d(2019, 1, 1), end: Some(d(2019, 1, 5)) })]
    #[case(None, Some(d(2019, 1, 1)), None, None, ApodSelection::Range { start: d(2019, 1, 1), end: None })]
    fn test_selection_precedence(
        #[case] date: Option<NaiveDate>,
        #[case] start: Option<NaiveDate>,
        #[case] end: Option<NaiveDate>,
        #[case] count: Option<u32>,
        #[case] expected: ApodSelection,
    ) {
        let selection = ApodSelection::from_options(date, start, end, count).unwrap();
        assert_eq!(selection, expected);
    }

    #[rstest]
    #[case(None, None, Some(d(2020, 1, 1)), None)] // end without start
    #[case(Some(d(1995, 6, 15)), None, None, None)] // before first APOD
    #[case(None, Some(d(2020, 1, 10)), Some(d(2020, 1, 1)), None)] // reversed range
    #[case(None, Some(d(1990, 1, 1)), None, None)]
    #[case(None, None, None, Some(0))]
    #[case(None, None, None, Some(101))]
    fn test_invalid_selections_are_rejected(
        #[case] date: Option<NaiveDate>,
        #[case] start: Option<NaiveDate>,
        #[case] end: Option<NaiveDate>,
        #[case] count: Option<u32>,
    ) {
        let result = ApodSelection::from_options(date, start, end, count);
        assert!(matches!(result, Err(AppError::Cli(_))), "got {:?}", result);
    }

    #[test]
    fn test_first_apod_date_is_accepted() {
        assert!(ApodSelection::Date(apod_first_date()).validate().is_ok());
        assert!(ApodSelection::Random(APOD_MAX_COUNT).validate().is_ok());
    }

    #[test]
    fn test_query_params_per_selection() {
        assert!(ApodSelection::Today.query_params().is_empty());
        assert_eq!(
            ApodSelection::Date(d(2026, 1, 18)).query_params(),
            vec![("date", "2026-01-18".to_string())]
        );
        assert_eq!(
            ApodSelection::Range {
                start: d(2026, 1, 1),
                end: Some(d(2026, 1, 7))
            }
            .query_params(),
            vec![
                ("start_date", "2026-01-01".to_string()),
                ("end_date", "2026-01-07".to_string())
            ]
        );
        assert_eq!(
            ApodSelection::Random(5).query_params(),
            vec![("count", "5".to_string())]
        );
    }
}
