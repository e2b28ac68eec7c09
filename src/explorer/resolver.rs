//! Date Resolver
//!
//! Turns a local date or date-time string into the closest block number on
//! the requested side of that instant.

use super::client::ExplorerClient;
use crate::error::{FetchError, FetchResult};
use crate::types::Closest;
use crate::utils::value_as_u64;
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use std::ops::RangeInclusive;

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (midnight)
pub fn parse_date(date_str: &str) -> FetchResult<NaiveDateTime> {
    let invalid = || {
        FetchError::validation(format!(
            "Invalid date format: '{}'. Expected 'YYYY-MM-DD' or 'YYYY-MM-DD HH:MM:SS'.",
            date_str
        ))
    };

    // chrono alone also takes signs, padding whitespace, a missing separator
    // and leap seconds
    if !has_date_shape(date_str) {
        return Err(invalid());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, DATE_TIME_FORMAT) {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)
}

/// `YYYY-M[M]-D[D]`, optionally followed by whitespace and `H[H]:M[M]:S[S]`
/// with seconds below 60
fn has_date_shape(input: &str) -> bool {
    let (date, time) = match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], Some(input[idx..].trim_start())),
        None => (input, None),
    };

    if digit_fields(date, '-', &[4..=4, 1..=2, 1..=2]).is_none() {
        return false;
    }

    match time {
        None => true,
        Some(time) => digit_fields(time, ':', &[1..=2, 1..=2, 1..=2])
            .and_then(|fields| fields[2].parse::<u32>().ok())
            .map_or(false, |seconds| seconds < 60),
    }
}

/// Split on `sep` and require each part to be ASCII digits of the given width
fn digit_fields<'a>(input: &'a str, sep: char, widths: &[RangeInclusive<usize>]) -> Option<Vec<&'a str>> {
    let fields: Vec<&str> = input.split(sep).collect();
    let well_formed = fields.len() == widths.len()
        && fields
            .iter()
            .zip(widths)
            .all(|(field, width)| width.contains(&field.len()) && field.bytes().all(|b| b.is_ascii_digit()));

    well_formed.then_some(fields)
}

/// Unix timestamp of a wall-clock time in the local zone.
/// Ambiguous times (DST fall-back) take the earlier instant.
pub fn local_timestamp(naive: &NaiveDateTime) -> FetchResult<i64> {
    Local
        .from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| {
            FetchError::validation(format!(
                "Date '{}' does not exist in the local time zone",
                naive.format(DATE_TIME_FORMAT)
            ))
        })
}

impl ExplorerClient<'_> {
    /// Resolve a date string to the nearest block `before` or `after` it
    pub fn resolve_block(&self, date_str: &str, closest: Closest) -> FetchResult<u64> {
        let naive = parse_date(date_str)?;
        let timestamp = local_timestamp(&naive)?;
        self.block_at(timestamp, closest)
    }

    /// Nearest block to a Unix timestamp
    pub fn block_at(&self, timestamp: i64, closest: Closest) -> FetchResult<u64> {
        crate::log_debug!("resolver", "Resolving block by time",
            timestamp = timestamp, closest = closest);

        let envelope = self.call(vec![
            ("module", "block".to_string()),
            ("action", "getblocknobytime".to_string()),
            ("timestamp", timestamp.to_string()),
            ("closest", closest.as_str().to_string()),
        ])?;

        if !envelope.is_success() {
            return Err(FetchError::upstream(format!(
                "Error fetching block number: {}",
                envelope.reason()
            )));
        }

        value_as_u64(&envelope.result).ok_or_else(|| {
            FetchError::parse_error(format!(
                "Explorer returned a non-numeric block number: {}",
                envelope.result
            ))
        })
    }
}
