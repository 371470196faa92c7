//! CSV export of the yearly cash-flow table.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::finance::YearCashFlow;

/// Column header of the cash-flow CSV.
const HEADER: &str = "year,inflated_savings,maintenance,inverter_replacement,net_flow,cumulative";

/// Exports the cash-flow table to a CSV file at the given path.
///
/// Writes a header row followed by one row per year, starting with the
/// year-0 investment. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `years` - Cash-flow rows, year 0 first
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_cash_flow_csv(years: &[YearCashFlow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_cash_flow_csv(years, buf)
}

/// Writes the cash-flow table as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_cash_flow_csv(years: &[YearCashFlow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for y in years {
        wtr.write_record(&[
            y.year.to_string(),
            format!("{:.2}", y.inflated_savings),
            format!("{:.2}", y.maintenance),
            format!("{:.2}", y.inverter_replacement),
            format!("{:.2}", y.net_flow),
            format!("{:.2}", y.cumulative),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
