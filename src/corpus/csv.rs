//! CSV corpus provider.
//!
//! The first row is the header. One column holds the comment text (default
//! `Text`), another the binary label selected by name, for example:
//!
//! ```csv
//! CommentId,Text,IsToxic,IsAbusive
//! c1,"What a stupid video",True,False
//! c2,"Thanks, very helpful",False,False
//! ```
//!
//! Labels become `bool`. Accepted spellings are `1`/`0` and `true`/`false`
//! in any case; anything else is rejected with the offending record number.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::corpus::Corpus;
use crate::error::{Result, SpathaError};

/// Default name of the text column.
pub const DEFAULT_TEXT_COLUMN: &str = "Text";

/// Reads labelled comments from CSV.
#[derive(Debug, Clone)]
pub struct CsvCorpusReader {
    /// Column holding the comment text
    text_column: String,
    /// CSV delimiter character (default: ',')
    delimiter: u8,
    /// Whether to trim whitespace from fields
    trim: bool,
}

impl Default for CsvCorpusReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvCorpusReader {
    /// Create a reader for comma-separated files with a `Text` column.
    pub fn new() -> Self {
        CsvCorpusReader {
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            delimiter: b',',
            trim: true,
        }
    }

    /// Set the name of the text column.
    pub fn with_text_column<S: Into<String>>(mut self, column: S) -> Self {
        self.text_column = column.into();
        self
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter as u8;
        self
    }

    /// Set whether to trim whitespace from fields.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Read the corpus for `label_column` from a file.
    pub fn read_path<P: AsRef<Path>>(&self, path: P, label_column: &str) -> Result<Corpus<bool>> {
        let file = std::fs::File::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), label_column, "reading csv corpus");
        self.read(file, label_column)
    }

    /// Read the corpus for `label_column` from any reader.
    pub fn read<R: Read>(&self, reader: R, label_column: &str) -> Result<Corpus<bool>> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let text_index = column_index(&headers, &self.text_column)?;
        let label_index = column_index(&headers, label_column)?;

        let mut texts = Vec::new();
        let mut labels = Vec::new();
        for (record_number, record) in csv_reader.records().enumerate() {
            let record = record?;
            let text = record.get(text_index).unwrap_or_default();
            let raw_label = record.get(label_index).unwrap_or_default();
            let label = parse_label(raw_label).ok_or_else(|| {
                SpathaError::invalid_input(format!(
                    "record {}: cannot read '{raw_label}' in column '{label_column}' as a binary label",
                    record_number + 1
                ))
            })?;
            texts.push(text.to_string());
            labels.push(label);
        }

        Corpus::new(texts, labels)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| SpathaError::invalid_input(format!("CSV has no column named '{name}'")))
}

/// Parse a binary label spelling.
pub fn parse_label(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "CommentId,Text,IsToxic,IsAbusive\n\
                        c1,\"What a stupid, stupid video\",True,1\n\
                        c2,Thanks very helpful,False,0\n\
                        c3,  Go away troll  ,TRUE,false\n";

    #[test]
    fn test_read_label_columns() {
        let reader = CsvCorpusReader::new();
        let toxic = reader.read(DATA.as_bytes(), "IsToxic").unwrap();
        assert_eq!(toxic.len(), 3);
        assert_eq!(toxic.texts()[0], "What a stupid, stupid video");
        assert_eq!(toxic.texts()[2], "Go away troll");
        assert_eq!(toxic.labels(), &[true, false, true]);

        let abusive = reader.read(DATA.as_bytes(), "IsAbusive").unwrap();
        assert_eq!(abusive.labels(), &[true, false, false]);
    }

    #[test]
    fn test_missing_column() {
        let reader = CsvCorpusReader::new();
        assert!(matches!(
            reader.read(DATA.as_bytes(), "IsProvocative"),
            Err(SpathaError::InvalidInput(_))
        ));
        let reader = CsvCorpusReader::new().with_text_column("Body");
        assert!(reader.read(DATA.as_bytes(), "IsToxic").is_err());
    }

    #[test]
    fn test_bad_label_reports_record() {
        let data = "Text,IsToxic\nfine,0\nweird,maybe\n";
        let err = CsvCorpusReader::new()
            .read(data.as_bytes(), "IsToxic")
            .unwrap_err();
        assert!(err.to_string().contains("record 2"));
    }

    #[test]
    fn test_custom_delimiter() {
        let data = "Text;Label\nhello there;1\n";
        let corpus = CsvCorpusReader::new()
            .with_delimiter(';')
            .read(data.as_bytes(), "Label")
            .unwrap();
        assert_eq!(corpus.labels(), &[true]);
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("1"), Some(true));
        assert_eq!(parse_label(" False "), Some(false));
        assert_eq!(parse_label("yes"), None);
        assert_eq!(parse_label(""), None);
    }
}
