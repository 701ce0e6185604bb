//! CSV export of records.

use crate::domain::error::StockdeskError;
use crate::domain::record::{Record, StockField};
use std::io::Write;
use std::path::Path;

/// Write `records` with a header row, in the order given.
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<(), StockdeskError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["id"];
    header.extend(StockField::ALL.iter().map(|f| f.name()));
    wtr.write_record(&header)?;

    for record in records {
        let id = record.id.to_string();
        let mut row = vec![id.as_str()];
        row.extend(StockField::ALL.iter().map(|f| record.field(*f)));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_to_file(path: &Path, records: &[Record]) -> Result<(), StockdeskError> {
    let file = std::fs::File::create(path)?;
    write_records(file, records)?;
    log::info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordId;
    use tempfile::TempDir;

    fn record(id: u64, code: &str) -> Record {
        Record {
            id: RecordId(id),
            date: "2020-01-01".into(),
            trade_code: code.into(),
            high: "1,001.5".into(),
            low: "9".into(),
            open: "10".into(),
            close: "10".into(),
            volume: "100".into(),
        }
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[record(2, "B"), record(1, "A")]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,date,trade_code,high,low,open,close,volume");
        assert!(lines[1].starts_with("2,2020-01-01,B,"));
        assert!(lines[2].starts_with("1,"));
    }

    #[test]
    fn quotes_values_containing_commas() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[record(1, "A")]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"1,001.5\""));
    }

    #[test]
    fn export_to_file_round_trips_through_reader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stocks.csv");
        export_to_file(&path, &[record(1, "A"), record(2, "B")]).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let codes: Vec<String> = rdr
            .records()
            .map(|r| r.unwrap().get(2).unwrap().to_string())
            .collect();
        assert_eq!(codes, vec!["A", "B"]);
    }
}
