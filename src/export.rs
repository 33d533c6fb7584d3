use std::io;
use std::time;

use failure::Fail;
use log::info;

use crate::model::SurroundingParcel;

#[derive(Debug, PartialEq)]
pub struct ExportStats {
    pub total_rows: u32,
}

#[derive(Debug, Fail)]
pub enum ExportError {
    #[fail(display = "I/O error: {}", _0)]
    Io(io::Error),
    #[fail(display = "Csv error: {}", _0)]
    Csv(csv::Error),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err)
    }
}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

/// Writes a distance search result set as CSV with an
/// `acres,address,geom,parcelid` header. Missing values are left empty.
pub fn write_surrounding_parcels<W: io::Write>(
    records: &[SurroundingParcel],
    output: W,
    delimiter: u8,
) -> Result<ExportStats, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(output);

    let start_instant = time::Instant::now();
    let mut total_rows = 0;

    for record in records {
        csv_writer.serialize(record)?;
        total_rows += 1;
    }
    csv_writer.flush()?;

    info!(
        "Exported {} parcels in {} ms",
        total_rows,
        start_instant.elapsed().as_millis()
    );

    Ok(ExportStats { total_rows })
}
