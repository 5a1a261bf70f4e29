pub mod market_csv;
pub mod pattern_csv;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

fn csv_reader(text: &str) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

/// Field `idx` of `record`, or `""` when the record is short.
fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or_default()
}
