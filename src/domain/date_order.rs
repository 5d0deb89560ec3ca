//! Date field order inference.
//!
//! Works on the date triples of the shaped lines, in file order, and falls
//! through three tiers:
//!
//! 1. Magnitude: a field above 31 is the year, a field above 12 is not a month.
//! 2. Change frequency: in a time series the day changes most often and the
//!    year least often. Each of the six orders is scored against the observed
//!    change counts; only a perfect, magnitude-consistent score is accepted.
//! 3. Elimination: from a partially known triple (a unique most-changing day,
//!    or a known year at one end) the rest follows by position.

use crate::domain::error::FormatError;
use crate::domain::grammar::{DateField, DateOrder};
use tracing::debug;

/// Per-position change counts and maxima over a sequence of date triples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateStats {
    pub changes: [u32; 3],
    pub max: [u32; 3],
    pub rows: usize,
}

impl DateStats {
    pub fn collect(dates: &[[u32; 3]]) -> Self {
        let mut stats = DateStats::default();
        let mut previous: Option<[u32; 3]> = None;
        for date in dates {
            for pos in 0..3 {
                stats.max[pos] = stats.max[pos].max(date[pos]);
                if let Some(prev) = previous {
                    if prev[pos] != date[pos] {
                        stats.changes[pos] += 1;
                    }
                }
            }
            previous = Some(*date);
            stats.rows += 1;
        }
        stats
    }

    /// Whether `order` is compatible with the largest value seen at each
    /// position.
    pub fn is_consistent(&self, order: DateOrder) -> bool {
        self.max[order.position_of(DateField::Month)] <= 12
            && self.max[order.position_of(DateField::Day)] <= 31
    }

    fn unique_most_changing(&self) -> Option<usize> {
        let top = *self.changes.iter().max()?;
        let mut hits = (0..3).filter(|&p| self.changes[p] == top);
        match (hits.next(), hits.next()) {
            (Some(pos), None) => Some(pos),
            _ => None,
        }
    }

    fn unique_least_changing(&self) -> Option<usize> {
        let bottom = *self.changes.iter().min()?;
        let mut hits = (0..3).filter(|&p| self.changes[p] == bottom);
        match (hits.next(), hits.next()) {
            (Some(pos), None) => Some(pos),
            _ => None,
        }
    }
}

/// Outcome of the magnitude rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Resolved(DateOrder),
    /// Year position, if one was found.
    Partial(Option<usize>),
}

/// Tier 1.
///
/// The first triple with a leading field above 31 settles (year, month, day).
/// A trailing field above 31 marks the year at the end, after which the first
/// field above 12 among the other two is the day.
pub fn magnitude_rule(dates: &[[u32; 3]]) -> Magnitude {
    let mut year = None;
    for date in dates {
        if year.is_none() {
            if date[0] > 31 {
                return Magnitude::Resolved(DateOrder::Ymd);
            }
            if date[2] > 31 {
                year = Some(2);
            }
        }
        if year == Some(2) {
            if date[0] > 12 {
                return Magnitude::Resolved(DateOrder::Dmy);
            }
            if date[1] > 12 {
                return Magnitude::Resolved(DateOrder::Mdy);
            }
        }
    }
    Magnitude::Partial(year)
}

/// Number of strictly satisfied orderings (day > month, month > year,
/// day > year) among the change counts, or `None` when `order` contradicts
/// the observed magnitudes.
pub fn score(order: DateOrder, stats: &DateStats) -> Option<u8> {
    if !stats.is_consistent(order) {
        return None;
    }
    let c = |field| stats.changes[order.position_of(field)];
    let (day, month, year) = (c(DateField::Day), c(DateField::Month), c(DateField::Year));
    Some((day > month) as u8 + (month > year) as u8 + (day > year) as u8)
}

/// Tier 2. A strict order of the change counts identifies at most one order.
pub fn change_frequency_rule(stats: &DateStats) -> Option<DateOrder> {
    DateOrder::ALL
        .into_iter()
        .find(|&order| score(order, stats) == Some(3))
}

/// Tier 3.
///
/// `known_year` comes from the magnitude rule and takes precedence over the
/// least-changing position. A day in the middle puts the month on the left;
/// a year at one end with no clear day puts the day next to it.
pub fn elimination_rule(stats: &DateStats, known_year: Option<usize>) -> Option<DateOrder> {
    let year = known_year.or_else(|| stats.unique_least_changing());
    let day = stats
        .unique_most_changing()
        .filter(|&d| Some(d) != year);

    let order = match (year, day) {
        (Some(y), Some(d)) => DateOrder::from_positions(y, 3 - y - d, d),
        (Some(0), None) => Some(DateOrder::Ydm),
        (Some(2), None) => Some(DateOrder::Mdy),
        (None, Some(0)) => Some(DateOrder::Dmy),
        (None, Some(1)) => Some(DateOrder::Mdy),
        (None, Some(2)) => Some(DateOrder::Ymd),
        _ => None,
    }?;

    stats.is_consistent(order).then_some(order)
}

/// Infers the date order from the date triples of the data rows.
pub fn infer_date_order(dates: &[[u32; 3]]) -> Result<DateOrder, FormatError> {
    if dates.is_empty() {
        return Err(FormatError::FormatUndetermined {
            reason: "no dated rows found".to_string(),
        });
    }

    let known_year = match magnitude_rule(dates) {
        Magnitude::Resolved(order) => {
            debug!(%order, "date order resolved by magnitude");
            return Ok(order);
        }
        Magnitude::Partial(year) => year,
    };

    let stats = DateStats::collect(dates);
    if let Some(order) = change_frequency_rule(&stats) {
        debug!(%order, changes = ?stats.changes, "date order resolved by change frequency");
        return Ok(order);
    }

    if let Some(order) = elimination_rule(&stats, known_year) {
        debug!(%order, changes = ?stats.changes, "date order resolved by elimination");
        return Ok(order);
    }

    Err(FormatError::FormatUndetermined {
        reason: format!(
            "field changes {:?} over {} rows are ambiguous",
            stats.changes, stats.rows
        ),
    })
}
