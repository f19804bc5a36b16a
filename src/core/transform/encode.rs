//! CSV encoding of tabular artifacts

use crate::domain::{ReportflowError, Result, TabularArtifact};
use csv::{Terminator, WriterBuilder};

/// Encodes an artifact as CSV with the fixed header row
///
/// Records end with `\n`. Fields containing commas, quotes or newlines are
/// quoted.
pub fn to_csv(artifact: &TabularArtifact) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(artifact.header())?;
    for row in artifact.rows() {
        let sales = row.sales.to_string();
        writer.write_record([row.date.as_str(), row.product.as_str(), sales.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportflowError::Serialization(format!("CSV encoding failed: {e}")))
}
