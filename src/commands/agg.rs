use super::CommandError;
use crate::db::Store;
use crate::sync::{Poller, ReadFeed};
use std::future::Future;
use std::time::Duration;

static COMMAND: &str = "agg";

const NANOS_PER_UNIT: [(&str, f64); 8] = [
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("μs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3600e9),
];

/// Polls feeds until the shutdown future resolves.
pub struct Agg {
    interval: Duration,
}

impl Agg {
    pub fn new(interval: &str) -> Result<Self, CommandError> {
        Ok(Self {
            interval: parse_interval(interval)?,
        })
    }

    pub fn command() -> &'static str {
        COMMAND
    }

    pub async fn execute<F: Future<Output = ()>>(
        &self,
        store: &dyn Store,
        reader: &dyn ReadFeed,
        shutdown: F,
    ) -> String {
        let cycles = Poller::new(store, reader, self.interval).run(shutdown).await;

        format!("Stopped after {} collection cycles", cycles)
    }
}

/// Durations written the way `agg` takes them: `500ms`, `30s`, `1m`, `1h30m`, `1.5h`.
pub fn parse_interval(input: &str) -> Result<Duration, CommandError> {
    let invalid = || CommandError::InvalidInterval(input.to_string());

    let mut rest = input.trim();

    if rest.is_empty() {
        return Err(invalid());
    }

    let mut nanos: f64 = 0.0;

    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let value: f64 = number.parse().map_err(|_| invalid())?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let per_unit = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, per_unit)| *per_unit)
            .ok_or_else(invalid)?;

        nanos += value * per_unit;
        rest = tail;
    }

    if nanos < 1.0 || !nanos.is_finite() || nanos >= u64::MAX as f64 {
        return Err(invalid());
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}
