//! Record splitting with physical line tracking.
//!
//! A record ends at a line terminator outside double quotes, so quoted fields
//! may span several lines. Blank lines come back as empty records instead of
//! being skipped, and every record carries the file line it starts on.

use std::io::{self, BufRead};

use csv::StringRecord;

use crate::error::RowError;

/// The undecoded bytes of one CSV record, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: u64,
    pub bytes: Vec<u8>,
}

impl RawRecord {
    pub fn is_blank(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Split into fields. A blank line is a single empty field.
    pub fn fields(&self) -> Result<StringRecord, RowError> {
        if self.is_blank() {
            return Ok(StringRecord::from(vec![""]));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.bytes.as_slice());

        let mut record = StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(_) => Ok(record),
            Err(err) => {
                let reason = match err.kind() {
                    csv::ErrorKind::Utf8 { .. } => "row is not valid UTF-8".to_string(),
                    _ => err.to_string(),
                };
                Err(RowError::Malformed { reason })
            }
        }
    }
}

/// Iterator over the [`RawRecord`]s of a buffered input.
pub struct RecordLines<R> {
    input: R,
    next_line: u64,
}

impl<R: BufRead> RecordLines<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            next_line: 1,
        }
    }
}

impl<R: BufRead> Iterator for RecordLines<R> {
    type Item = io::Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.next_line;
        let mut bytes = Vec::new();
        let mut quotes = 0usize;

        loop {
            let start = bytes.len();
            match self.input.read_until(b'\n', &mut bytes) {
                Ok(0) => break,
                Ok(_) => {
                    self.next_line += 1;
                    quotes += bytes[start..].iter().filter(|b| **b == b'"').count();
                    if quotes % 2 == 0 {
                        break;
                    }
                }
                Err(err) => return Some(Err(err)),
            }
        }

        if bytes.is_empty() {
            return None;
        }

        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }

        Some(Ok(RawRecord { line, bytes }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &[u8]) -> Vec<(u64, String)> {
        RecordLines::new(input)
            .map(|raw| {
                let raw = raw.expect("in-memory read");
                (raw.line, String::from_utf8_lossy(&raw.bytes).into_owned())
            })
            .collect()
    }

    #[test]
    fn blank_lines_are_kept_with_their_numbers() {
        assert_eq!(
            split(b"a,b,c\n\n\n\nbad\n"),
            vec![
                (1, "a,b,c".to_string()),
                (2, String::new()),
                (3, String::new()),
                (4, String::new()),
                (5, "bad".to_string()),
            ]
        );
        assert_eq!(
            split(b"\n\nbad\n"),
            vec![(1, String::new()), (2, String::new()), (3, "bad".to_string())]
        );
    }

    #[test]
    fn quoted_newlines_stay_in_one_record() {
        assert_eq!(
            split(b"\"Mary\nAnn\",Lee,m@example.com\nnext\n"),
            vec![
                (1, "\"Mary\nAnn\",Lee,m@example.com".to_string()),
                (3, "next".to_string()),
            ]
        );
    }

    #[test]
    fn crlf_and_missing_final_newline() {
        assert_eq!(
            split(b"a,b,c\r\nd,e,f"),
            vec![(1, "a,b,c".to_string()), (2, "d,e,f".to_string())]
        );
        assert!(split(b"").is_empty());
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_input() {
        assert_eq!(
            split(b"\"open,b,c\nmore\n"),
            vec![(1, "\"open,b,c\nmore".to_string())]
        );
    }

    #[test]
    fn fields_of_blank_and_quoted_records() {
        let blank = RawRecord {
            line: 1,
            bytes: Vec::new(),
        };
        assert_eq!(blank.fields().expect("blank").len(), 1);

        let quoted = RawRecord {
            line: 1,
            bytes: b"\"de la cruz\",\"a, b\",x@y.com".to_vec(),
        };
        let fields = quoted.fields().expect("quoted");
        assert_eq!(fields.len(), 3);
        assert_eq!(&fields[1], "a, b");

        let invalid = RawRecord {
            line: 1,
            bytes: b"J\xffhn,Smith,j@example.com".to_vec(),
        };
        assert_eq!(
            invalid.fields(),
            Err(RowError::Malformed {
                reason: "row is not valid UTF-8".to_string()
            })
        );
    }
}
