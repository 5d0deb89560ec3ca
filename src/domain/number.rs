//! Decimal token normalisation.

use crate::domain::grammar::DecimalSeparator;

/// Parses a price token written with either conventional decimal separator.
///
/// A single separator is the decimal point whichever it is. A token carrying
/// both is read as thousands grouping plus decimal: the separator occurring
/// last is the decimal point and the other is dropped. A separator repeated
/// without the other one can only be grouping.
///
/// Price columns matched by the row grammar carry at most one separator, so
/// the grouping forms only arise for tokens handed in directly.
pub fn parse_decimal(token: &str) -> Option<f64> {
    let token = token.trim();
    let dots = token.matches('.').count();
    let commas = token.matches(',').count();

    let normalised = match (dots, commas) {
        (0, 0) => token.to_string(),
        (_, 0) if dots > 1 => token.replace('.', ""),
        (0, _) if commas > 1 => token.replace(',', ""),
        (_, 0) => token.to_string(),
        (0, _) => token.replace(',', "."),
        _ => {
            let decimal = if token.rfind('.') > token.rfind(',') {
                '.'
            } else {
                ','
            };
            token
                .chars()
                .filter(|c| *c == decimal || c.is_ascii_digit() || *c == '-')
                .map(|c| if c == decimal { '.' } else { c })
                .collect()
        }
    };

    normalised.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The separator a token uses as its decimal point, if it uses exactly one
/// separator exactly once.
pub fn fractional_separator(token: &str) -> Option<DecimalSeparator> {
    let mut seps = token.chars().filter_map(DecimalSeparator::from_char);
    match (seps.next(), seps.next()) {
        (Some(sep), None) => Some(sep),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plain_integer() {
        assert_eq!(parse_decimal("42"), Some(42.0));
    }

    #[test]
    fn dot_and_comma_are_both_accepted_alone() {
        assert_relative_eq!(parse_decimal("1.1050").unwrap(), 1.105);
        assert_relative_eq!(parse_decimal("1,1050").unwrap(), 1.105);
    }

    #[test]
    fn both_separators_read_as_grouping_plus_decimal() {
        assert_relative_eq!(parse_decimal("1,234.50").unwrap(), 1234.5);
        assert_relative_eq!(parse_decimal("1.234,50").unwrap(), 1234.5);
        assert_relative_eq!(parse_decimal("1.234.567,25").unwrap(), 1_234_567.25);
    }

    #[test]
    fn repeated_separator_is_grouping() {
        assert_relative_eq!(parse_decimal("1.234.567").unwrap(), 1_234_567.0);
        assert_relative_eq!(parse_decimal("1,234,567").unwrap(), 1_234_567.0);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn fractional_separator_detection() {
        assert_eq!(fractional_separator("1.25"), Some(DecimalSeparator::Dot));
        assert_eq!(fractional_separator("1,25"), Some(DecimalSeparator::Comma));
        assert_eq!(fractional_separator("125"), None);
        assert_eq!(fractional_separator("1.234,5"), None);
    }
}
