//! Row parser: applies an inferred [`Grammar`] to text.
//!
//! Lines that do not match the exact row pattern, or whose fields do not form
//! a valid timestamp or number, are skipped. Only a text without a single
//! parsed row is an error. Bars come out in line order.

use crate::domain::error::FormatError;
use crate::domain::grammar::Grammar;
use crate::domain::inference::infer;
use crate::domain::number::parse_decimal;
use crate::domain::ohlcv::Bar;
use crate::domain::row_shape::RowMatcher;
use chrono::{Datelike, Local, NaiveDate};
use regex::Captures;
use tracing::debug;

/// Maps a two-digit year into the century that does not lie in the future.
///
/// Years of 100 and above are returned unchanged.
pub fn correct_two_digit_year(year: i32, current_year: i32) -> i32 {
    if year >= 100 {
        return year;
    }
    let year = year + 2000;
    if year > current_year { year - 100 } else { year }
}

pub fn parse(text: &str, grammar: &Grammar) -> Result<Vec<Bar>, FormatError> {
    parse_as_of(text, grammar, Local::now().year())
}

/// [`parse`] with an explicit current year for two-digit-year correction.
pub fn parse_as_of(
    text: &str,
    grammar: &Grammar,
    current_year: i32,
) -> Result<Vec<Bar>, FormatError> {
    let matcher = RowMatcher::new(grammar);
    debug!(pattern = matcher.as_str(), "row pattern built");

    let mut bars = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let Some(caps) = matcher.captures(line) else {
            continue;
        };
        match bar_from_captures(&caps, current_year) {
            Some(bar) => bars.push(bar),
            None => debug!(line = index + 1, "row matched but fields are invalid, skipped"),
        }
    }

    if bars.is_empty() {
        return Err(FormatError::NoMatchingRows);
    }
    Ok(bars)
}

/// Infers the grammar of `text` and parses it in one go.
pub fn load_bars(text: &str) -> Result<Vec<Bar>, FormatError> {
    let grammar = infer(text)?;
    parse(text, &grammar)
}

fn bar_from_captures(caps: &Captures<'_>, current_year: i32) -> Option<Bar> {
    let int = |name: &str| caps.name(name)?.as_str().parse::<u32>().ok();
    let price = |name: &str| parse_decimal(caps.name(name)?.as_str());

    let year = correct_two_digit_year(int("year")? as i32, current_year);
    let time = NaiveDate::from_ymd_opt(year, int("month")?, int("day")?)?.and_hms_opt(
        int("hour")?,
        int("min")?,
        caps.name("sec").map_or(Some(0), |m| m.as_str().parse().ok())?,
    )?;

    Some(Bar {
        time,
        open: price("open")?,
        high: price("high")?,
        low: price("low")?,
        close: price("close")?,
        volume: caps.name("volume")?.as_str().parse().ok()?,
    })
}
