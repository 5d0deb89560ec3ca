//! Inferred structure of one price-data text.
//!
//! A [`Grammar`] is computed once per input by
//! [`infer`](crate::domain::inference::infer) and consumed by the row parser.

use std::fmt;

/// A component of the date triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Year,
    Month,
    Day,
}

impl DateField {
    /// Capture group name used by the row matcher.
    pub fn group_name(self) -> &'static str {
        match self {
            DateField::Year => "year",
            DateField::Month => "month",
            DateField::Day => "day",
        }
    }
}

/// Left-to-right order of the three date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateOrder {
    Ymd,
    Ydm,
    Myd,
    Mdy,
    Dym,
    Dmy,
}

impl DateOrder {
    pub const ALL: [DateOrder; 6] = [
        DateOrder::Ymd,
        DateOrder::Ydm,
        DateOrder::Myd,
        DateOrder::Mdy,
        DateOrder::Dym,
        DateOrder::Dmy,
    ];

    pub fn fields(self) -> [DateField; 3] {
        use DateField::*;
        match self {
            DateOrder::Ymd => [Year, Month, Day],
            DateOrder::Ydm => [Year, Day, Month],
            DateOrder::Myd => [Month, Year, Day],
            DateOrder::Mdy => [Month, Day, Year],
            DateOrder::Dym => [Day, Year, Month],
            DateOrder::Dmy => [Day, Month, Year],
        }
    }

    /// Zero-based position of `field` within the triple.
    pub fn position_of(self, field: DateField) -> usize {
        self.fields()
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default()
    }

    /// The order placing year, month and day at the given positions, if those
    /// positions form a permutation of 0..3.
    pub fn from_positions(year: usize, month: usize, day: usize) -> Option<DateOrder> {
        DateOrder::ALL.into_iter().find(|order| {
            order.position_of(DateField::Year) == year
                && order.position_of(DateField::Month) == month
                && order.position_of(DateField::Day) == day
        })
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .fields()
            .iter()
            .map(|field| match field {
                DateField::Year => "year",
                DateField::Month => "month",
                DateField::Day => "day",
            })
            .collect();
        write!(f, "{}", names.join("-"))
    }
}

/// Order of the four price columns. Only two layouts occur in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceLayout {
    /// open, high, low, close
    OpenHighLowClose,
    /// open, low, high, close
    OpenLowHighClose,
}

impl PriceLayout {
    /// Capture group names in column order.
    pub fn group_names(self) -> [&'static str; 4] {
        match self {
            PriceLayout::OpenHighLowClose => ["open", "high", "low", "close"],
            PriceLayout::OpenLowHighClose => ["open", "low", "high", "close"],
        }
    }
}

impl fmt::Display for PriceLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.group_names().join(","))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecimalSeparator {
    #[default]
    Dot,
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(self) -> char {
        match self {
            DecimalSeparator::Dot => '.',
            DecimalSeparator::Comma => ',',
        }
    }

    pub fn from_char(c: char) -> Option<DecimalSeparator> {
        match c {
            '.' => Some(DecimalSeparator::Dot),
            ',' => Some(DecimalSeparator::Comma),
            _ => None,
        }
    }
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub date_order: DateOrder,
    pub price_layout: PriceLayout,
    pub decimal_separator: DecimalSeparator,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "date: {}, prices: {}, decimal separator: {}",
            self.date_order, self.price_layout, self.decimal_separator
        )
    }
}
