// ------------------------------------------------------------------------------------------------
// --- Service status and arrivals
//
// There is no live feed behind these: the status is a fixed bulletin and the
// arrivals are spaced from the given clock time.
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::utils::{add_minutes, create_date};

use super::stations::{Line, MetroStation};

pub const ARRIVALS_SHOWN: i64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatus {
    pub status: String,
    pub delay: u32,
    pub next_maintenance: Option<NaiveDate>,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetroStatus {
    pub timestamp: DateTime<FixedOffset>,
    pub operational: bool,
    pub lines: BTreeMap<Line, LineStatus>,
    pub announcements: Vec<String>,
}

pub fn build_metro_status(now: DateTime<FixedOffset>) -> MetroStatus {
    let lines = BTreeMap::from([
        (
            Line::Blue,
            LineStatus {
                status: "Normal".to_string(),
                delay: 0,
                next_maintenance: create_date(2025, 8, 25),
                frequency: "4-6 minutes".to_string(),
            },
        ),
        (
            Line::Green,
            LineStatus {
                status: "Normal".to_string(),
                delay: 0,
                next_maintenance: create_date(2025, 8, 23),
                frequency: "5-7 minutes".to_string(),
            },
        ),
    ]);

    MetroStatus {
        timestamp: now,
        operational: true,
        lines,
        announcements: vec![
            "Metro services running normally".to_string(),
            "Please maintain social distancing".to_string(),
            "Masks mandatory in metro premises".to_string(),
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    pub line: Line,
    pub direction: &'static str,
    /// Clock time, e.g. "09:32 am".
    pub arrival: String,
    pub minutes_away: i64,
    pub platform: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTimings {
    pub station: &'static str,
    pub last_updated: String,
    pub timings: Vec<Arrival>,
}

/// Three trains, 2, 7 and 12 minutes out, alternating direction and platform.
pub fn build_live_timings(station: &MetroStation, now: DateTime<FixedOffset>) -> LiveTimings {
    let timings = (0..ARRIVALS_SHOWN)
        .map(|i| {
            let minutes_away = i * 5 + 2;
            let northbound = i % 2 == 0;
            Arrival {
                line: station.line,
                direction: if northbound { "Northbound" } else { "Southbound" },
                arrival: add_minutes(now, minutes_away)
                    .format("%I:%M %P")
                    .to_string(),
                minutes_away,
                platform: if northbound { "Platform 1" } else { "Platform 2" },
            }
        })
        .collect();

    LiveTimings {
        station: station.name,
        last_updated: now.format("%I:%M:%S %P").to_string(),
        timings,
    }
}
