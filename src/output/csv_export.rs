//! CSV export of the ledger

use crate::output::OutputResult;
use crate::storage::{ContactRecord, Ledger, LEDGER_HEADER};
use std::io::Write;
use std::path::Path;

/// Writes the whole ledger to a CSV file
///
/// The first line is always the ledger header, even for an empty ledger.
///
/// # Returns
///
/// The number of data rows written.
pub fn export_csv(ledger: &dyn Ledger, path: &Path) -> OutputResult<usize> {
    let rows = ledger.read_all()?;
    let file = std::fs::File::create(path)?;
    write_csv(&rows, file)?;
    tracing::info!("Exported {} row(s) to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Writes rows as CSV to any writer
pub fn write_csv<W: Write>(rows: &[ContactRecord], writer: W) -> OutputResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(LEDGER_HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryLedger;

    fn record() -> ContactRecord {
        ContactRecord {
            name: "Hydro, Serwis".to_string(),
            email: "a@hydro.pl, b@hydro.pl".to_string(),
            phone: "12 345".to_string(),
            website: "http://hydro.pl".to_string(),
            address: "Kraków".to_string(),
            industry: "hydraulik".to_string(),
            place_id: "P1".to_string(),
        }
    }

    #[test]
    fn test_header_and_quoting() {
        let mut out = Vec::new();
        write_csv(&[record()], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Name,Email,Phone,Website,Address,Industry,PlaceID")
        );
        assert_eq!(
            lines.next(),
            Some("\"Hydro, Serwis\",\"a@hydro.pl, b@hydro.pl\",12 345,http://hydro.pl,Kraków,hydraulik,P1")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_empty_ledger_writes_header() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("leads.csv");

        let written = export_csv(&MemoryLedger::new(), &path).unwrap();
        assert_eq!(written, 0);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().trim_end(),
            "Name,Email,Phone,Website,Address,Industry,PlaceID"
        );
    }
}
