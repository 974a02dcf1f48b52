//! Report body decoding
//!
//! The statistics endpoint answers with a `;`-delimited CSV document whose
//! header uses provider column labels. Decoders turn it into rows keyed by
//! schema field name.

mod decoders;
mod types;

pub use decoders::ReportCsvDecoder;
pub use types::{ColumnMap, RecordDecoder, REPORT_CSV_DELIMITER};

#[cfg(test)]
mod tests;
