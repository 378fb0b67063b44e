//! Rating text parsing.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("numeric token pattern is valid"));

/// First numeric token of `text` as a float, `0.0` when there is none.
///
/// Deliberately format-agnostic: "4.5 out of 5", "★★★★☆ (4)" and "90%"
/// all yield their first number, including unrelated ones such as review
/// counts.
pub fn parse_rating(text: &str) -> f64 {
    NUMERIC_TOKEN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_with_suffix() {
        assert_eq!(parse_rating("4.5 stars"), 4.5);
        assert_eq!(parse_rating("4.5"), 4.5);
    }

    #[test]
    fn test_no_number() {
        assert_eq!(parse_rating("no rating"), 0.0);
        assert_eq!(parse_rating(""), 0.0);
        assert_eq!(parse_rating("★★★★☆"), 0.0);
    }

    #[test]
    fn test_first_token_wins() {
        assert_eq!(parse_rating("five star, 4 reviews"), 4.0);
        assert_eq!(parse_rating("Rated 3 out of 5"), 3.0);
        assert_eq!(parse_rating("★★★★☆ (4)"), 4.0);
    }

    #[test]
    fn test_percentage_and_integer() {
        assert_eq!(parse_rating("90%"), 90.0);
        assert_eq!(parse_rating("  5  "), 5.0);
    }

    #[test]
    fn test_trailing_dot_is_not_part_of_token() {
        assert_eq!(parse_rating("4. Great"), 4.0);
        assert_eq!(parse_rating("v.2.5"), 2.5);
    }

    #[test]
    fn test_parsing_is_stable_on_output() {
        let once = parse_rating("4.5 out of 5");
        assert_eq!(parse_rating(&once.to_string()), once);
    }
}
