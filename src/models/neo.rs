//! Near Earth Object Web Service (NeoWs) payloads.
//!
//! NeoWs reports velocities and miss distances as decimal *strings*; the
//! accessors on [`CloseApproach`] parse them on demand.

use super::DATE_FORMAT;
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Longest window (in days) the feed endpoint accepts.
pub const NEO_FEED_MAX_DAYS: i64 = 7;

/// Response structure for `/neo/rest/v1/feed`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NeoFeed {
    pub element_count: u32,
    /// Objects keyed by approach date (`YYYY-MM-DD`), iterated in date order.
    pub near_earth_objects: BTreeMap<String, Vec<NearEarthObject>>,
}

/// A single near-Earth object (also the `/neo/rest/v1/neo/{id}` response).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NearEarthObject {
    pub id: String,
    #[serde(default)]
    pub neo_reference_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub nasa_jpl_url: Option<String>,
    #[serde(default)]
    pub absolute_magnitude_h: Option<f64>,
    #[serde(default)]
    pub estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
    #[serde(default)]
    pub is_sentry_object: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EstimatedDiameter {
    pub kilometers: Option<DiameterRange>,
    pub meters: Option<DiameterRange>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloseApproach {
    pub close_approach_date: String,
    #[serde(default)]
    pub close_approach_date_full: Option<String>,
    #[serde(default)]
    pub epoch_date_close_approach: Option<i64>,
    pub relative_velocity: RelativeVelocity,
    pub miss_distance: MissDistance,
    #[serde(default)]
    pub orbiting_body: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelativeVelocity {
    pub kilometers_per_second: String,
    pub kilometers_per_hour: String,
    pub miles_per_hour: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MissDistance {
    pub astronomical: String,
    pub lunar: String,
    pub kilometers: String,
    pub miles: String,
}

/// NeoWs sends numbers as strings. "NaN" and "inf" parse as floats but are not measurements.
fn parse_measure(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl CloseApproach {
    pub fn miss_distance_km(&self) -> Option<f64> {
        parse_measure(&self.miss_distance.kilometers)
    }

    pub fn miss_distance_lunar(&self) -> Option<f64> {
        parse_measure(&self.miss_distance.lunar)
    }

    pub fn velocity_km_s(&self) -> Option<f64> {
        parse_measure(&self.relative_velocity.kilometers_per_second)
    }
}

/// A flattened, display-ready view of one asteroid's close approach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsteroidSummary {
    pub id: String,
    pub name: String,
    pub approach_date: String,
    pub hazardous: bool,
    pub diameter_min_m: Option<f64>,
    pub diameter_max_m: Option<f64>,
    pub miss_distance_km: Option<f64>,
    pub velocity_km_s: Option<f64>,
}

impl NearEarthObject {
    /// Summarizes the object using its first recorded close approach (the
    /// feed only returns the approach for the queried date).
    pub fn summary(&self) -> AsteroidSummary {
        let approach = self.close_approach_data.first();
        let meters = self
            .estimated_diameter
            .as_ref()
            .and_then(|d| d.meters);
        AsteroidSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            approach_date: approach
                .map(|a| a.close_approach_date.clone())
                .unwrap_or_default(),
            hazardous: self.is_potentially_hazardous_asteroid,
            diameter_min_m: meters.map(|m| m.estimated_diameter_min),
            diameter_max_m: meters.map(|m| m.estimated_diameter_max),
            miss_distance_km: approach.and_then(CloseApproach::miss_distance_km),
            velocity_km_s: approach.and_then(CloseApproach::velocity_km_s),
        }
    }
}

impl NeoFeed {
    /// Flattens the feed into summaries ordered by closest approach first.
    /// Objects with an unknown miss distance sort last.
    pub fn summaries(&self, hazardous_only: bool) -> Vec<AsteroidSummary> {
        let mut rows: Vec<AsteroidSummary> = self
            .near_earth_objects
            .values()
            .flatten()
            .filter(|neo| !hazardous_only || neo.is_potentially_hazardous_asteroid)
            .map(NearEarthObject::summary)
            .collect();

        rows.sort_by(|a, b| match (a.miss_distance_km, b.miss_distance_km) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        rows
    }

    pub fn hazardous_count(&self) -> usize {
        self.near_earth_objects
            .values()
            .flatten()
            .filter(|neo| neo.is_potentially_hazardous_asteroid)
            .count()
    }
}

/// Checks a feed window: ordered, and no longer than [`NEO_FEED_MAX_DAYS`].
pub fn validate_feed_window(start: NaiveDate, end: Option<NaiveDate>) -> Result<()> {
    let Some(end) = end else {
        return Ok(());
    };
    if end < start {
        return Err(AppError::Cli(format!(
            "Asteroid feed end date {} is before start date {}",
            end.format(DATE_FORMAT),
            start.format(DATE_FORMAT)
        )));
    }
    let days = (end - start).num_days();
    if days > NEO_FEED_MAX_DAYS {
        return Err(AppError::Cli(format!(
            "Asteroid feed window is limited to {} days, got {}",
            NEO_FEED_MAX_DAYS, days
        )));
    }
    Ok(())
}

/// Asteroid ids are numeric SPK-IDs (e.g. `3542519`).
pub fn validate_asteroid_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Cli(format!(
            "Asteroid id must be a numeric SPK-ID, got '{}'",
            id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    /// Builds a NeoWs-shaped JSON object for tests.
    fn neo_json(id: &str, hazardous: bool, miss_km: &str) -> serde_json::Value {
        json!({
            "id": id,
            "neo_reference_id": id,
            "name": format!("({})", id),
            "nasa_jpl_url": format!("https://ssd.jpl.nasa.gov/tools/sbdb_lookup.html#/?sstr={}", id),
            "absolute_magnitude_h": 21.4,
            "estimated_diameter": {
                "kilometers": { "estimated_diameter_min": 0.12, "estimated_diameter_max": 0.27 },
                "meters": { "estimated_diameter_min": 120.0, "estimated_diameter_max": 270.0 }
            },
            "is_potentially_hazardous_asteroid": hazardous,
            "close_approach_data": [{
                "close_approach_date": "2026-10-19",
                "close_approach_date_full": "2026-Oct-19 04:20",
                "epoch_date_close_approach": 1792297200000_i64,
                "relative_velocity": {
                    "kilometers_per_second": "12.5",
                    "kilometers_per_hour": "45000.0",
                    "miles_per_hour": "27961.6"
                },
                "miss_distance": {
                    "astronomical": "0.05",
                    "lunar": "19.45",
                    "kilometers": miss_km,
                    "miles": "4647918.1"
                },
                "orbiting_body": "Earth"
            }],
            "is_sentry_object": false
        })
    }

    fn feed(objects: serde_json::Value) -> NeoFeed {
        serde_json::from_value(json!({
            "element_count": 3,
            "near_earth_objects": objects
        }))
        .unwrap()
    }

    #[test]
    fn test_close_approach_parses_string_numbers() {
        let neo: NearEarthObject = serde_json::from_value(neo_json("1", false, "7479893.6")).unwrap();
        let approach = &neo.close_approach_data[0];
        assert_eq!(approach.miss_distance_km(), Some(7479893.6));
        assert_eq!(approach.velocity_km_s(), Some(12.5));
        assert_eq!(approach.miss_distance_lunar(), Some(19.45));
    }

    #[test]
    fn test_summaries_sorted_by_miss_distance_with_unknown_last() {
        let feed = feed(json!({
            "2026-10-20": [neo_json("2", true, "500.0"), neo_json("4", false, "n/a")],
            "2026-10-19": [neo_json("1", false, "9000.0"), neo_json("3", true, "100.0")]
        }));
        let ids: Vec<String> = feed.summaries(false).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["3", "2", "1", "4"]);
    }

    #[test]
    fn test_non_finite_distances_are_unknown_and_sort_last() {
        let feed = feed(json!({
            "2026-10-19": [
                neo_json("1", false, "NaN"),
                neo_json("2", false, "800.0"),
                neo_json("3", false, "300.0"),
                neo_json("4", false, "inf"),
                neo_json("5", false, "50.0"),
                neo_json("6", false, "NaN"),
                neo_json("7", false, "20.0")
            ]
        }));
        let rows = feed.summaries(false);

        let known: Vec<f64> = rows.iter().filter_map(|s| s.miss_distance_km).collect();
        assert_eq!(known, vec![20.0, 50.0, 300.0, 800.0]);

        let tail: Vec<&str> = rows[4..].iter().map(|s| s.id.as_str()).collect();
        assert_eq!(tail.len(), 3);
        assert!(rows[4..].iter().all(|s| s.miss_distance_km.is_none()));
        for id in ["1", "4", "6"] {
            assert!(tail.contains(&id));
        }
    }

    #[test]
    fn test_summaries_hazardous_only() {
        let feed = feed(json!({
            "2026-10-19": [neo_json("1", false, "9000.0"), neo_json("3", true, "100.0")]
        }));
        let rows = feed.summaries(true);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].hazardous);
        assert_eq!(rows[0].diameter_max_m, Some(270.0));
        assert_eq!(feed.hazardous_count(), 1);
    }

    #[test]
    fn test_lookup_shape_with_sparse_fields() {
        let neo: NearEarthObject =
            serde_json::from_value(json!({ "id": "99942", "name": "99942 Apophis (2004 MN4)" }))
                .unwrap();
        let summary = neo.summary();
        assert_eq!(summary.approach_date, "");
        assert_eq!(summary.miss_distance_km, None);
        assert_eq!(summary.diameter_min_m, None);
        assert!(!summary.hazardous);
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(d(2026, 10, 1), None, true)]
    #[case(d(2026, 10, 1), Some(d(2026, 10, 1)), true)]
    #[case(d(2026, 10, 1), Some(d(2026, 10, 8)), true)]
    #[case(d(2026, 10, 1), Some(d(2026, 10, 9)), false)]
    #[case(d(2026, 10, 5), Some(d(2026, 10, 1)), false)]
    fn test_feed_window(
        #[case] start: NaiveDate,
        #[case] end: Option<NaiveDate>,
        #[case] ok: bool,
    ) {
        assert_eq!(validate_feed_window(start, end).is_ok(), ok);
    }

    #[rstest]
    #[case("3542519", true)]
    #[case(" 2000433 ", true)]
    #[case("", false)]
    #[case("433 Eros", false)]
    #[case("-1", false)]
    fn test_asteroid_id_validation(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(validate_asteroid_id(id).is_ok(), ok);
    }
}
