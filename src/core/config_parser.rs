/*
 * Parses the plain-text data item list. Each line has the form `NAME:SIZE`,
 * where SIZE is a decimal number of megabytes (fractions allowed).
 *
 * Lines with the wrong shape (no colon, an empty name, or a value starting
 * with a letter) are collected verbatim as rejects so they can be reported to
 * the user as a batch. A line that has the right shape but whose value still
 * fails to parse as a number aborts the whole parse with a `ParseError`.
 * Parsing is pure: it produces entries and never touches any catalog.
 */
use super::models::DataItem;
use std::num::ParseFloatError;

const NAME_VALUE_SEPARATOR: char = ':';

#[derive(Debug)]
pub enum ParseError {
    InvalidNumber {
        line_number: usize,
        line: String,
        source: ParseFloatError,
    },
    InvalidSize {
        line_number: usize,
        line: String,
        value: f64,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidNumber {
                line_number,
                line,
                source,
            } => write!(
                f,
                "Line {line_number}: size in '{line}' is not a number: {source}"
            ),
            ParseError::InvalidSize {
                line_number,
                line,
                value,
            } => write!(
                f,
                "Line {line_number}: size {value} in '{line}' must be a finite, non-negative number"
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::InvalidNumber { source, .. } => Some(source),
            ParseError::InvalidSize { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Outcome of a successful parse: accepted entries and rejected lines, both in input order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedConfig {
    pub entries: Vec<DataItem>,
    pub rejects: Vec<String>,
}

/*
 * Checks the shape of a line without parsing the number: there must be a
 * colon, a non-empty name in front of it, and a first value character that
 * is present and not alphabetic.
 */
pub fn is_well_formed(line: &str) -> bool {
    let Some((name, value)) = line.split_once(NAME_VALUE_SEPARATOR) else {
        return false;
    };
    if name.is_empty() {
        return false;
    }
    match value.chars().next() {
        Some(first) => !first.is_alphabetic(),
        None => false,
    }
}

fn parse_line(line_number: usize, line: &str) -> Result<DataItem> {
    // Callers only pass well-formed lines, so the separator is present.
    let (name, value_text) = line
        .split_once(NAME_VALUE_SEPARATOR)
        .unwrap_or((line, ""));
    let size_mb: f64 = value_text
        .trim()
        .parse()
        .map_err(|source| ParseError::InvalidNumber {
            line_number,
            line: line.to_string(),
            source,
        })?;
    if !size_mb.is_finite() || size_mb < 0.0 {
        return Err(ParseError::InvalidSize {
            line_number,
            line: line.to_string(),
            value: size_mb,
        });
    }
    Ok(DataItem::new(name, size_mb))
}

/*
 * Parses a sequence of configuration lines. Malformed lines go to `rejects`;
 * the first numeric failure on a well-formed line aborts with an error.
 */
pub fn parse_lines<I, S>(lines: I) -> Result<ParsedConfig>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedConfig::default();
    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if is_well_formed(line) {
            let item = parse_line(index + 1, line)?;
            log::trace!(
                "ConfigParser: Accepted '{}' ({} MB).",
                item.name,
                item.size_mb
            );
            parsed.entries.push(item);
        } else {
            log::debug!("ConfigParser: Wrong format on line {}: '{line}'", index + 1);
            parsed.rejects.push(line.to_string());
        }
    }
    Ok(parsed)
}

// Editors on Windows often save UTF-8 with a leading byte order mark.
const UTF8_BOM: char = '\u{feff}';

pub fn parse_str(text: &str) -> Result<ParsedConfig> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    parse_lines(text.lines())
}

/// Renders an item back into the `NAME:SIZE` line format.
pub fn format_line(item: &DataItem) -> String {
    format!("{}{NAME_VALUE_SEPARATOR}{}", item.name, item.size_mb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_lines_produce_one_item_each() {
        // Arrange
        let lines = ["P4_1A_HR_____:10", "B:2.5", "C:+3", "D:0"];

        // Act
        let parsed = parse_lines(lines).expect("well-formed input should parse");

        // Assert
        assert!(parsed.rejects.is_empty());
        assert_eq!(
            parsed.entries,
            vec![
                DataItem::new("P4_1A_HR_____", 10.0),
                DataItem::new("B", 2.5),
                DataItem::new("C", 3.0),
                DataItem::new("D", 0.0),
            ]
        );
    }

    #[test]
    fn test_malformed_lines_are_rejected_verbatim() {
        let lines = ["no colon here", "NAME:abc", "", "EMPTY:", ":5", "OK:1"];

        let parsed = parse_lines(lines).unwrap();

        assert_eq!(parsed.entries, vec![DataItem::new("OK", 1.0)]);
        assert_eq!(
            parsed.rejects,
            vec!["no colon here", "NAME:abc", "", "EMPTY:", ":5"]
        );
    }

    #[test]
    fn test_numeric_failure_on_accepted_line_is_fatal() {
        let lines = ["A:1", "B:1.2.3", "C:4"];

        let err = parse_lines(lines).unwrap_err();

        match err {
            ParseError::InvalidNumber {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "B:1.2.3");
            }
            other => panic!("Expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_value_splits_on_first_colon_only() {
        // "1:2" is not a number, so this well-formed line is a parse failure.
        assert!(matches!(
            parse_lines(["A:1:2"]),
            Err(ParseError::InvalidNumber { line_number: 1, .. })
        ));
    }

    #[test]
    fn test_negative_size_is_fatal() {
        assert!(matches!(
            parse_lines(["A:-1"]),
            Err(ParseError::InvalidSize { line_number: 1, .. })
        ));
    }

    #[test]
    fn test_overflowing_size_is_fatal() {
        for line in ["A:1e400", "A:-1e400"] {
            assert!(
                matches!(
                    parse_lines([line]),
                    Err(ParseError::InvalidSize { line_number: 1, .. })
                ),
                "Line {line:?} should be an invalid size"
            );
        }
    }

    #[test]
    fn test_parse_str_strips_leading_byte_order_mark() {
        let parsed = parse_str("\u{feff}A:1\nB:2\n").unwrap();
        assert_eq!(
            parsed.entries,
            vec![DataItem::new("A", 1.0), DataItem::new("B", 2.0)]
        );
    }

    #[test]
    fn test_value_whitespace_is_trimmed() {
        let parsed = parse_lines(["A: 7 "]).unwrap();
        assert_eq!(parsed.entries, vec![DataItem::new("A", 7.0)]);
    }

    #[test]
    fn test_duplicates_are_kept_in_entry_order() {
        let parsed = parse_str("A:1\nA:2\n").unwrap();
        assert_eq!(
            parsed.entries,
            vec![DataItem::new("A", 1.0), DataItem::new("A", 2.0)]
        );
    }

    #[test]
    fn test_parse_str_handles_crlf() {
        let parsed = parse_str("A:1\r\nB:2.5\r\n").unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[1], DataItem::new("B", 2.5));
        assert!(parsed.rejects.is_empty());
    }

    #[test]
    fn test_format_line_is_accepted_by_parser() {
        let item = DataItem::new("P4_1A_HR_____", 0.25);
        let line = format_line(&item);
        assert_eq!(line, "P4_1A_HR_____:0.25");
        assert!(is_well_formed(&line));
    }
}
