//! Line grammars for price-data text.
//!
//! A data line looks like
//! `[sep]* date [sep]+ HH:MM[:SS] [sep]+ price price price price [sep]+ volume [sep]*`
//! where `sep` is one of tab, space, `;` or `,`. [`RowShape`] is the loose
//! form used while the structure is still unknown; [`RowMatcher`] is the exact
//! pattern built from an inferred [`Grammar`].

use crate::domain::grammar::{DateField, Grammar};
use regex::{Captures, Regex};
use std::sync::OnceLock;

const SEP: &str = r"[\t ;,]";
const DATE_PART: &str = r"\d{1,4}";
const DATE_SEP: &str = r"[./-]";
const TIME: &str = r"(?P<hour>\d{2}):(?P<min>\d{2})(?::(?P<sec>\d{2}))?";
const PRICE: &str = r"\d+(?:[.,]\d+)?";
const VOLUME: &str = r"\d+";

/// A line that has the shape of a data row, before any field is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedLine<'a> {
    /// The date triple in written order.
    pub date: [u32; 3],
    /// The four price tokens in written order.
    pub prices: [&'a str; 4],
}

pub struct RowShape {
    regex: Regex,
}

impl RowShape {
    /// The shared loose validator.
    pub fn get() -> &'static RowShape {
        static SHAPE: OnceLock<RowShape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            let pattern = format!(
                "^{SEP}*(?P<d1>{DATE_PART}){DATE_SEP}(?P<d2>{DATE_PART}){DATE_SEP}(?P<d3>{DATE_PART})\
                 {SEP}+{TIME}\
                 {SEP}+(?P<p1>{PRICE}){SEP}+(?P<p2>{PRICE}){SEP}+(?P<p3>{PRICE}){SEP}+(?P<p4>{PRICE})\
                 {SEP}+{VOLUME}{SEP}*$"
            );
            RowShape {
                regex: Regex::new(&pattern).expect("row shape pattern is valid"),
            }
        })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    pub fn shape<'a>(&self, line: &'a str) -> Option<ShapedLine<'a>> {
        let caps = self.regex.captures(line)?;
        let date_part = |name: &str| caps.name(name)?.as_str().parse::<u32>().ok();
        let price = |name: &str| caps.name(name).map(|m| m.as_str());
        Some(ShapedLine {
            date: [date_part("d1")?, date_part("d2")?, date_part("d3")?],
            prices: [price("p1")?, price("p2")?, price("p3")?, price("p4")?],
        })
    }

    /// Every shaped line of `text`, in order.
    pub fn scan<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ShapedLine<'a>> + 'a {
        text.lines().filter_map(move |line| self.shape(line))
    }
}

/// The exact row pattern for one grammar, with named captures for every field.
pub struct RowMatcher {
    regex: Regex,
}

impl RowMatcher {
    pub fn new(grammar: &Grammar) -> Self {
        let [a, b, c] = grammar
            .date_order
            .fields()
            .map(|field: DateField| format!("(?P<{}>{DATE_PART})", field.group_name()));
        let prices: Vec<String> = grammar
            .price_layout
            .group_names()
            .iter()
            .map(|name| format!("(?P<{name}>{PRICE})"))
            .collect();
        let column_sep = format!("{SEP}+");
        let pattern = format!(
            "^{SEP}*{a}{DATE_SEP}{b}{DATE_SEP}{c}{SEP}+{TIME}{SEP}+{prices}{SEP}+(?P<volume>{VOLUME}){SEP}*$",
            prices = prices.join(column_sep.as_str()),
        );
        Self {
            regex: Regex::new(&pattern).expect("row pattern is valid"),
        }
    }

    pub fn captures<'a>(&self, line: &'a str) -> Option<Captures<'a>> {
        self.regex.captures(line)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
