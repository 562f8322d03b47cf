use std::fmt;

use crate::RawResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    NotNumeric(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty response"),
            Self::NotNumeric(text) => write!(f, "not a number: {text:?}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Interprets a response as a decimal literal.
///
/// The module pads its answers with line endings and the read buffer with
/// NULs, so both are trimmed before parsing.
pub fn parse(response: &RawResponse) -> Result<f64, ParseError> {
    let text = String::from_utf8_lossy(response.as_bytes());
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());

    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    text.parse::<f64>()
        .map_err(|_| ParseError::NotNumeric(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_bytes(bytes: &[u8]) -> Result<f64, ParseError> {
        parse(&RawResponse::from_slice(bytes))
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_bytes(b"72.4"), Ok(72.4));
        assert_eq!(parse_bytes(b"800"), Ok(800.0));
        assert_eq!(parse_bytes(b"-3.5"), Ok(-3.5));
    }

    #[test]
    fn test_trims_line_endings_and_padding() {
        assert_eq!(parse_bytes(b"45.1\r\n"), Ok(45.1));
        assert_eq!(parse_bytes(b" 98.6\0\0\0"), Ok(98.6));
    }

    #[test]
    fn test_empty_is_not_zero() {
        assert_eq!(parse(&RawResponse::no_data()), Err(ParseError::Empty));
        assert_eq!(parse_bytes(b"\r\n"), Err(ParseError::Empty));
        assert_eq!(parse_bytes(b"\0\0\0\0"), Err(ParseError::Empty));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(
            parse_bytes(b"err"),
            Err(ParseError::NotNumeric("err".to_string()))
        );
        assert!(matches!(parse_bytes(b"72.4.1"), Err(ParseError::NotNumeric(_))));
        assert!(matches!(parse_bytes(&[0xff, 0xfe]), Err(ParseError::NotNumeric(_))));
    }

    #[test]
    fn test_truncated_response_is_parsed_as_is() {
        // the first 12 bytes of "1234.5678901234"
        assert_eq!(parse_bytes(b"1234.5678901234"), Ok(1234.5678901));
    }
}
