//! CSV training data reader.
//!
//! The first row is a header naming the columns:
//! ```csv
//! text,categories,language,filename
//! "Sorting algorithms lecture","lecture, algorithms",english,week1.pdf
//! "Weekly sync notes",meeting,english,
//! ```
//!
//! `text` is required. `categories`, `language` and `filename` may be
//! missing or empty.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::document::document::TrainingRecord;
use crate::error::{LecternError, Result};

/// Reads [`TrainingRecord`]s from CSV input.
#[derive(Debug, Clone)]
pub struct CsvRecordReader {
    /// CSV delimiter character (default: ',')
    delimiter: u8,
    /// Whether to allow flexible field counts
    flexible: bool,
}

impl Default for CsvRecordReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRecordReader {
    /// Create a new CSV reader with comma delimiter.
    pub fn new() -> Self {
        CsvRecordReader {
            delimiter: b',',
            flexible: false,
        }
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter as u8;
        self
    }

    /// Set whether to allow flexible field counts.
    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Read every record from a CSV file.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<TrainingRecord>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            LecternError::invalid_training_data(format!(
                "cannot open training data {}: {e}",
                path.display()
            ))
        })?;
        let records = self.read(file)?;
        log::info!("Read {} training records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read every record from any reader.
    pub fn read<R: Read>(&self, input: R) -> Result<Vec<TrainingRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::Headers)
            .flexible(self.flexible)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h == "text") {
            return Err(LecternError::invalid_training_data(
                "CSV header must contain a 'text' column",
            ));
        }

        let mut records = Vec::new();
        for (row, record) in reader.deserialize::<TrainingRecord>().enumerate() {
            let record = record.map_err(|e| {
                LecternError::invalid_training_data(format!(
                    "malformed CSV record at row {}: {e}",
                    row + 2
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_basic_parsing() {
        let csv = "text,categories,language\n\
                   Sorting lecture,\"lecture, algorithms\",english\n\
                   Họp nhóm,meeting,vietnamese\n";
        let records = CsvRecordReader::new().read(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Sorting lecture");
        assert_eq!(records[0].categories, "lecture, algorithms");
        assert_eq!(records[1].language, "vietnamese");
        assert_eq!(records[1].filename, None);
    }

    #[test]
    fn test_csv_optional_filename_column() {
        let csv = "text,categories,language,filename\n\
                   Budget,finance,english,q3.xlsx\n\
                   Notes,meeting,english,\n";
        let records = CsvRecordReader::new().read(csv.as_bytes()).unwrap();

        assert_eq!(records[0].filename.as_deref(), Some("q3.xlsx"));
        assert_eq!(records[1].filename, None);
    }

    #[test]
    fn test_csv_missing_text_column() {
        let csv = "body,categories\nhello,greeting\n";
        let result = CsvRecordReader::new().read(csv.as_bytes());
        assert!(matches!(result, Err(LecternError::InvalidTrainingData(_))));
    }

    #[test]
    fn test_csv_custom_delimiter() {
        let csv = "text\tcategories\tlanguage\nRust book\tbook\tenglish\n";
        let records = CsvRecordReader::new()
            .with_delimiter('\t')
            .read(csv.as_bytes())
            .unwrap();

        assert_eq!(records[0].categories, "book");
    }

    #[test]
    fn test_missing_file() {
        let result = CsvRecordReader::new().read_path("/nonexistent/training.csv");
        assert!(matches!(result, Err(LecternError::InvalidTrainingData(_))));
    }
}
