// src/services/export.rs
// DOCUMENTATION: CSV export sink
// PURPOSE: Render the final lead collection as a spreadsheet, one row per record

use crate::errors::LeadError;
use crate::models::{LeadRecord, NOT_AVAILABLE};
use std::io::Write;

/// Column headers, address-inclusive variant
const HEADERS_WITH_ADDRESS: [&str; 6] =
    ["Nom", "Adresse", "Téléphone", "Site Web", "Latitude", "Longitude"];

/// Column headers without the address column
const HEADERS_WITHOUT_ADDRESS: [&str; 5] =
    ["Nom", "Téléphone", "Site Web", "Latitude", "Longitude"];

/// CSV exporter
/// DOCUMENTATION: No value transformation happens here beyond rendering
/// missing coordinates as the sentinel
pub struct CsvExporter;

impl CsvExporter {
    /// Write the records as CSV to any sink
    ///
    /// # Arguments
    /// * `records` - Final, already deduplicated and filtered collection
    /// * `include_address` - Whether to emit the address column
    pub fn write<W: Write>(
        writer: W,
        records: &[LeadRecord],
        include_address: bool,
    ) -> Result<(), LeadError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        if include_address {
            csv_writer.write_record(HEADERS_WITH_ADDRESS)?;
        } else {
            csv_writer.write_record(HEADERS_WITHOUT_ADDRESS)?;
        }

        for record in records {
            let latitude = Self::render_coordinate(record.latitude);
            let longitude = Self::render_coordinate(record.longitude);

            if include_address {
                csv_writer.write_record([
                    record.name.as_str(),
                    record.address.as_str(),
                    record.phone.as_str(),
                    record.website.as_str(),
                    latitude.as_str(),
                    longitude.as_str(),
                ])?;
            } else {
                csv_writer.write_record([
                    record.name.as_str(),
                    record.phone.as_str(),
                    record.website.as_str(),
                    latitude.as_str(),
                    longitude.as_str(),
                ])?;
            }
        }

        csv_writer.flush().map_err(|e| LeadError::ExportError(e.to_string()))?;
        Ok(())
    }

    /// Render the records to an in-memory CSV buffer
    pub fn to_bytes(records: &[LeadRecord], include_address: bool) -> Result<Vec<u8>, LeadError> {
        let mut buffer = Vec::new();
        Self::write(&mut buffer, records, include_address)?;
        Ok(buffer)
    }

    fn render_coordinate(value: Option<f64>) -> String {
        match value {
            Some(v) => v.to_string(),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}
