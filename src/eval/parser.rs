//! Parsing of numbered-list answers and numbers embedded in free text

use crate::error::{EvalError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

/// `N. answer text` at the start of a line
static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*[0-9]+\.[ \t]*(.*)$").expect("numbered line pattern is valid")
});

/// Integers and decimals, with optional thousands separators
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+[.,0-9]+|[0-9]*\.[0-9]+|[0-9]+").expect("number pattern is valid")
});

/// A number pulled out of an answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            // integral floats keep a trailing ".0" so they read back as floats
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Extract the answers from a response of the form:
///
/// ```text
/// ANSWERS:
/// 1. ...
/// 2. ...
/// ```
///
/// Lines without a numeric prefix are dropped.
pub fn parse_response(response: &str) -> Vec<String> {
    NUMBERED_LINE
        .captures_iter(response)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end().to_string())
        .collect()
}

/// Like [`parse_response`], but fails unless exactly `expected` answers are found
pub fn parse_answers(response: &str, expected: usize) -> Result<Vec<String>> {
    let answers = parse_response(response);
    if answers.len() != expected {
        return Err(EvalError::AnswerCountMismatch {
            expected,
            found: answers.len(),
        });
    }
    Ok(answers)
}

fn format_number(raw: &str) -> Option<Number> {
    let cleaned = raw.trim_end_matches(['.', ',']).replace(',', "");
    if cleaned.contains('.') {
        cleaned.parse::<f64>().ok().map(Number::Float)
    } else {
        cleaned.parse::<i64>().ok().map(Number::Int)
    }
}

/// Pull every number out of `text` in order of appearance.
///
/// Trailing punctuation and thousands separators are stripped; a value with a
/// remaining decimal point becomes a float, otherwise an integer.
pub fn extract_and_format_numbers(text: &str) -> Vec<Number> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| {
            let number = format_number(m.as_str());
            if number.is_none() {
                debug!("Skipping unparseable number {:?}", m.as_str());
            }
            number
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_amount() {
        assert_eq!(extract_and_format_numbers("$23,526.80"), vec![Number::Float(23526.8)]);
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(extract_and_format_numbers("1591600"), vec![Number::Int(1591600)]);
        assert_eq!(extract_and_format_numbers("1,591,600."), vec![Number::Int(1591600)]);
    }

    #[test]
    fn test_order_preserved() {
        assert_eq!(
            extract_and_format_numbers("Total: 100, Tax: 5.5"),
            vec![Number::Int(100), Number::Float(5.5)]
        );
    }

    #[test]
    fn test_leading_decimal_point() {
        assert_eq!(extract_and_format_numbers("rate .75"), vec![Number::Float(0.75)]);
    }

    #[test]
    fn test_malformed_number_skipped() {
        assert_eq!(extract_and_format_numbers("version 1.2.3 and 7"), vec![Number::Int(7)]);
    }

    #[test]
    fn test_no_numbers() {
        assert!(extract_and_format_numbers("Pfizer").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::Float(23526.8).to_string(), "23526.8");
        assert_eq!(Number::Float(5.0).to_string(), "5.0");
        assert_eq!(Number::Int(48).to_string(), "48");
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["$23,526.80", "1591600", "Total: 100, Tax: 5.5", "4.150%", "12.0"] {
            for number in extract_and_format_numbers(text) {
                let again = extract_and_format_numbers(&number.to_string());
                assert_eq!(again, vec![number], "round trip of {number}");
            }
        }
    }

    #[test]
    fn test_parse_response() {
        let answers = parse_response("ANSWERS:\n1. Pfizer\n2. 2/8/2021\n");
        assert_eq!(answers, vec!["Pfizer", "2/8/2021"]);
    }

    #[test]
    fn test_parse_response_drops_unnumbered_lines() {
        let text = "Here you go\nANSWERS:\n1. 203.07\nnot numbered\n3.   BB5678  \r\n";
        let answers = parse_response(text);
        assert_eq!(answers, vec!["203.07", "BB5678"]);
        assert!(answers.len() <= text.lines().count());
    }

    #[test]
    fn test_parse_response_bounded_by_line_count() {
        let inputs = [
            "",
            "1.",
            "1.\n2.\n",
            "10. a\n2. b\nc\n",
            "Total is 5.5 dollars",
            "1. one 2. two",
        ];
        for input in inputs {
            assert!(parse_response(input).len() <= input.lines().count().max(1));
        }
    }

    #[test]
    fn test_parse_answers_count_mismatch() {
        let err = parse_answers("ANSWERS:\n1. Pfizer\n", 2).unwrap_err();
        assert!(matches!(err, EvalError::AnswerCountMismatch { expected: 2, found: 1 }));

        let answers = parse_answers("ANSWERS:\n1. Pfizer\n2. CVS", 2).unwrap();
        assert_eq!(answers, vec!["Pfizer", "CVS"]);
    }
}
