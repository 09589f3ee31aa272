//! CSV decoding of import rows and encoding of product exports.

use std::io::{Read, Write};

use crate::product::{ImportRow, Product};

/// Column order of [`write_products`].
pub const EXPORT_HEADERS: [&str; 7] = ["id", "name", "category", "brand", "stock", "unit", "status"];

/// Decodes a headered CSV into rows keyed by header name.
///
/// Header names are trimmed and lowercased; cell values are trimmed.
/// A structurally broken record fails the whole read; semantic problems
/// such as a missing name are left for the importer to count.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ImportRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(headers.iter().cloned().zip(record.iter()).collect());
    }
    Ok(rows)
}

/// Encodes products with [`EXPORT_HEADERS`]; absent optionals are empty cells.
pub fn write_products<W: Write>(writer: W, products: &[Product]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(EXPORT_HEADERS)?;
    for p in products {
        writer.write_record([
            p.id.to_string().as_str(),
            p.name.as_str(),
            p.category.as_deref().unwrap_or(""),
            p.brand.as_deref().unwrap_or(""),
            p.stock.to_string().as_str(),
            p.unit.as_deref().unwrap_or(""),
            p.status.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
