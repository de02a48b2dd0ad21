//! Tabular export of monthly schedules
//!
//! Pure serialization concern, external to the engine: writes the row
//! sequence as delimited text with a fixed 19-column layout.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::schedule::MonthlyRow;

/// Fixed column order of the export format
pub const EXPORT_COLUMNS: [&str; 19] = [
    "Month",
    "BankPayment",
    "BankInterest",
    "BankPrincipal",
    "BankBalance",
    "FamilyPayment",
    "FamilyInterest",
    "FamilyPrincipal",
    "FamilyBalance",
    "PMI",
    "Tax",
    "Insurance",
    "HOA",
    "Maintenance",
    "Utilities",
    "Escrow",
    "TotalMonthly",
    "HouseholdMonthly",
    "Equity",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write schedule CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error writing schedule: {0}")]
    Io(#[from] std::io::Error),
}

/// Write rows as CSV to any writer
pub fn write_csv<W: Write>(writer: W, rows: &[MonthlyRow]) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(EXPORT_COLUMNS)?;

    for row in rows {
        out.write_record(&[
            row.month.to_string(),
            format!("{:.2}", row.bank_payment),
            format!("{:.2}", row.bank_interest),
            format!("{:.2}", row.bank_principal),
            format!("{:.2}", row.bank_balance),
            format!("{:.2}", row.family_payment),
            format!("{:.2}", row.family_interest),
            format!("{:.2}", row.family_principal),
            format!("{:.2}", row.family_balance),
            format!("{:.2}", row.pmi),
            format!("{:.2}", row.property_tax),
            format!("{:.2}", row.insurance),
            format!("{:.2}", row.hoa),
            format!("{:.2}", row.maintenance),
            format!("{:.2}", row.utilities),
            format!("{:.2}", row.escrow),
            format!("{:.2}", row.total_monthly),
            format!("{:.2}", row.household_monthly),
            format!("{:.2}", row.equity),
        ])?;
    }

    out.flush()?;
    Ok(())
}

/// Write rows as CSV to a file path
pub fn write_csv_file<P: AsRef<Path>>(path: P, rows: &[MonthlyRow]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(file, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BankLoanTerms, LoanConfiguration, LoanKind};
    use crate::schedule::build_schedule;

    #[test]
    fn test_csv_layout() {
        let config = LoanConfiguration {
            home_price: 500_000.0,
            down_payment: 100_000.0,
            bank: BankLoanTerms {
                kind: LoanKind::Fixed,
                annual_rate_pct: 6.0,
                term_months: 360,
                ..Default::default()
            },
            horizon_years: 1,
            ..Default::default()
        };
        let result = build_schedule(&config);

        let mut buf = Vec::new();
        write_csv(&mut buf, &result.rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert_eq!(header, EXPORT_COLUMNS.join(","));

        let first = lines.next().unwrap();
        let fields: Vec<&str> = first.split(',').collect();
        assert_eq!(fields.len(), 19);
        assert_eq!(fields[0], "1");
        assert_eq!(fields[1], format!("{:.2}", result.rows[0].bank_payment));
        assert_eq!(fields[18], format!("{:.2}", result.rows[0].equity));

        // One line per row plus the header
        assert_eq!(text.lines().count(), 13);
    }
}
