//! Reading photo records from a CSV file

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::models::RawRecord;
use crate::NomenclatorError;

/// Read every row of a headerless `timestamp,latitude,longitude` file
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, NomenclatorError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let rows = parse_rows(file)?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse CSV rows from any reader; rows may have differing lengths
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRecord>, NomenclatorError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    reader
        .records()
        .map(|record| Ok(RawRecord::from(&record?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_rows() {
        let data = "2020-03-30T14:12:19Z,40.728808,-73.996106\n2020-03-29T14:20:10Z,40.728656\n";
        let rows = parse_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            RawRecord::from(["2020-03-30T14:12:19Z", "40.728808", "-73.996106"])
        );
        assert_eq!(rows[1].fields().len(), 2);
    }

    #[test]
    fn test_parse_rows_keeps_whitespace() {
        let rows = parse_rows(" 2020-03-30T14:12:19Z,1,2\n".as_bytes()).unwrap();
        assert_eq!(rows[0].fields()[0], " 2020-03-30T14:12:19Z");
    }

    #[test]
    fn test_parse_rows_rejects_invalid_utf8() {
        let data: &[u8] = b"2020-03-30T14:12:19Z,1,\xff\n";
        let result = parse_rows(data);
        assert!(matches!(result, Err(NomenclatorError::Input { .. })));
    }

    #[test]
    fn test_read_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2020-03-30T14:12:19Z,40.728808,-73.996106").unwrap();

        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_read_rows_missing_file() {
        let result = read_rows("/definitely/not/here.csv");
        assert!(matches!(result, Err(NomenclatorError::Io { .. })));
    }
}
