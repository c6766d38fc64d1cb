//! Publication dates as they show up in real feeds.
//!
//! Layouts are tried in a fixed order and the first one that parses wins. A
//! leading day name (`Mon, `) is checked for shape only, so feeds that put the
//! wrong weekday in front of a valid date still parse.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

const DAY_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to parse date: {input:?}")]
pub struct DateParseError {
    pub input: String,
}

enum Layout {
    Offset(&'static str),
    ZoneName(&'static str),
    Rfc3339,
    Naive(&'static str),
}

struct Candidate {
    weekday: bool,
    layout: Layout,
}

const CANDIDATES: [Candidate; 8] = [
    // Mon, 02 Jan 2006 15:04:05 -0700
    Candidate {
        weekday: true,
        layout: Layout::Offset("%d %b %Y %H:%M:%S%.f %z"),
    },
    // Mon, 02 Jan 2006 15:04:05 MST
    Candidate {
        weekday: true,
        layout: Layout::ZoneName("%d %b %Y %H:%M:%S%.f"),
    },
    Candidate {
        weekday: false,
        layout: Layout::Rfc3339,
    },
    // 2006-01-02T15:04:05-07:00
    Candidate {
        weekday: false,
        layout: Layout::Offset("%Y-%m-%dT%H:%M:%S%.f%:z"),
    },
    // 2006-01-02 15:04:05 -0700
    Candidate {
        weekday: false,
        layout: Layout::Offset("%Y-%m-%d %H:%M:%S%.f %z"),
    },
    // 2006-01-02 15:04:05
    Candidate {
        weekday: false,
        layout: Layout::Naive("%Y-%m-%d %H:%M:%S%.f"),
    },
    // Mon, 2 Jan 2006 15:04:05 -0700
    Candidate {
        weekday: true,
        layout: Layout::Offset("%e %b %Y %H:%M:%S%.f %z"),
    },
    // 02 Jan 2006 15:04:05 -0700
    Candidate {
        weekday: false,
        layout: Layout::Offset("%d %b %Y %H:%M:%S%.f %z"),
    },
];

pub fn parse(raw: &str) -> Result<DateTime<Utc>, DateParseError> {
    let input = raw.trim();

    CANDIDATES
        .iter()
        .find_map(|candidate| candidate.parse(input))
        .ok_or_else(|| DateParseError {
            input: raw.to_string(),
        })
}

impl Candidate {
    fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        let input = if self.weekday {
            strip_weekday(input)?
        } else {
            input
        };

        self.layout.parse(input)
    }
}

impl Layout {
    fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        match self {
            Layout::Offset(format) => DateTime::parse_from_str(input, format)
                .ok()
                .map(|date| date.with_timezone(&Utc)),
            Layout::ZoneName(format) => parse_with_zone_name(input, format),
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|date| date.with_timezone(&Utc)),
            Layout::Naive(format) => NaiveDateTime::parse_from_str(input, format)
                .ok()
                .map(|date| Utc.from_utc_datetime(&date)),
        }
    }
}

fn strip_weekday(input: &str) -> Option<&str> {
    let (day, rest) = input.split_once(", ")?;

    if DAY_NAMES.contains(&day.to_ascii_lowercase().as_str()) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn parse_with_zone_name(input: &str, format: &str) -> Option<DateTime<Utc>> {
    let (datetime, zone) = input.rsplit_once(' ')?;

    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(datetime, format).ok()?;
    let offset = FixedOffset::east_opt(zone_offset_hours(zone) * 3600)?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|date| date.with_timezone(&Utc))
}

// Unknown abbreviations are read as UTC.
fn zone_offset_hours(zone: &str) -> i32 {
    match zone.to_ascii_uppercase().as_str() {
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ => 0,
    }
}
