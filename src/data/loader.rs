// ============================================================
// Layer 4: Dataset Loader
// ============================================================
// Reads `diamonds.csv` with the csv crate and deserialises each
// row straight into a DiamondRecord via serde.
//
// The header row decides the column mapping, so column order
// does not matter and extra columns (the unnamed index column
// some exports carry) are skipped.
//
// Unlike a directory of documents, one bad row means the file
// itself is broken, so the whole load fails with the row's
// position instead of silently skipping it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::diamond::DiamondRecord;
use crate::domain::traits::DiamondSource;

/// Loads diamond rows from a CSV file on disk.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiamondSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<DiamondRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<DiamondRecord>().enumerate() {
            // +2: one for the header line, one for 1-based numbering
            let record = result.with_context(|| {
                format!("Malformed row {} in '{}'", row + 2, self.path.display())
            })?;
            records.push(record);
        }

        tracing::info!(
            "Loaded {} rows from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diamond::{Clarity, Color, Cut};
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_rows_and_ignores_index_column() {
        let file = write_csv(
            ",carat,cut,color,clarity,depth,table,price,x,y,z\n\
             1,0.23,Ideal,E,SI2,61.5,55,326,3.95,3.98,2.43\n\
             2,0.21,Premium,E,SI1,59.8,61,326,3.89,3.84,2.31\n\
             3,0.23,Very Good,E,VS1,56.9,65,327,4.05,4.07,2.31\n",
        );
        let records = CsvLoader::new(file.path()).load_all().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].cut, Cut::Ideal);
        assert_eq!(records[1].clarity, Clarity::SI1);
        assert_eq!(records[2].cut, Cut::VeryGood);
        assert_eq!(records[2].color, Color::E);
        assert_eq!(records[2].price, 327.0);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let file = write_csv(
            "price,carat,cut,color,clarity,depth,table,x,y,z\n\
             500,0.3,Good,J,I1,62.0,58,4.2,4.25,2.62\n",
        );
        let records = CsvLoader::new(file.path()).load_all().unwrap();
        assert_eq!(records[0].price, 500.0);
        assert_eq!(records[0].color, Color::J);
    }

    #[test]
    fn test_unknown_grade_fails_with_row_number() {
        let file = write_csv(
            "carat,cut,color,clarity,depth,table,price,x,y,z\n\
             0.23,Ideal,E,SI2,61.5,55,326,3.95,3.98,2.43\n\
             0.23,Superb,E,SI2,61.5,55,326,3.95,3.98,2.43\n",
        );
        let err = CsvLoader::new(file.path()).load_all().unwrap_err();
        assert!(format!("{err:#}").contains("row 3"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CsvLoader::new("does/not/exist.csv").load_all().unwrap_err();
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
