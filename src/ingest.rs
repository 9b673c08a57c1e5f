use crate::error::Result;
use crate::types::Record;
use csv::{ReaderBuilder, Trim};
use serde_json::{Map, Value};
use std::io::{BufRead, Read};
use tracing::{debug, warn};

/// Read sheet-export CSV into records.
///
/// The header row names the fields. The first `skip` data rows are header
/// remnants in the published sheets and are dropped.
pub fn read_csv<R: Read>(reader: R, skip: usize) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // Allow rows with different lengths
        .from_reader(reader);

    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        if index < skip {
            continue;
        }
        if row.len() != headers.len() {
            debug!(row = index + 1, fields = row.len(), "ragged CSV row");
        }
        records.push(
            headers
                .iter()
                .zip(row.iter())
                .filter(|(name, _)| !name.is_empty())
                .collect::<Record>(),
        );
    }

    debug!(rows = records.len(), skipped = skip, "read CSV records");
    Ok(records)
}

/// Read one JSON object per line.
///
/// Blank lines are skipped. Scalar values become text and `null` fields are
/// absent. A line that is not a JSON object fails the whole read.
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let object: Map<String, Value> = serde_json::from_str(&line).map_err(|e| {
            warn!(line = index + 1, error = %e, "malformed JSON-lines record");
            e
        })?;
        records.push(Record::from_json_object(&object));
    }
    debug!(rows = records.len(), "read JSON-lines records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn csv_skips_header_remnants() {
        let data = "\
Govt Scheme Name,Scheme Description
(name),(description)
---,---
Poultry Venture , Backyard units
Crop Loan,
";
        let records = read_csv(data.as_bytes(), 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("Govt Scheme Name"), "Poultry Venture");
        assert_eq!(records[0].field("Scheme Description"), "Backyard units");
        assert_eq!(records[1].get("Scheme Description"), None);
    }

    #[test]
    fn csv_tolerates_short_rows() {
        let data = "Type,DiseaseName,Locations\nOutbreak,ASF\n";
        let records = read_csv(data.as_bytes(), 0).unwrap();
        assert_eq!(records[0].field("DiseaseName"), "ASF");
        assert_eq!(records[0].field("Locations"), "");
    }

    #[test]
    fn json_lines_skip_blank_lines() {
        let data = "{\"Type\": \"Alert\"}\n\n{\"Type\": \"Info\"}\n";
        let records = read_json_lines(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].field("Type"), "Info");
    }

    #[test]
    fn json_lines_keep_numeric_fields() {
        let data = "{\"OBTID\": 3, \"Type\": \"Alert\", \"DiseaseName\": \"ASF\", \"Overview\": null}\n";
        let records = read_json_lines(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("OBTID"), "3");
        assert_eq!(records[0].field("DiseaseName"), "ASF");
        assert_eq!(records[0].get("Overview"), None);
    }

    #[test]
    fn json_lines_reject_non_objects() {
        for data in ["{\"Type\": \"Alert\"}\nnot json\n", "[1, 2]\n"] {
            let err = read_json_lines(data.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::Json(_)), "{data:?}");
        }
    }
}
