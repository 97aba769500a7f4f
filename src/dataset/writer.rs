use std::io::Write;
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use super::Dataset;
use crate::config::ConversionConfig;
use crate::error::OutputError;

/// CSV layout options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Header of the trailing well column
    pub well_column: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self::from(&ConversionConfig::default())
    }
}

impl From<&ConversionConfig> for CsvOptions {
    fn from(config: &ConversionConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            well_column: config.well_column.clone(),
        }
    }
}

/// Write `dataset` to `path` as delimited text.
///
/// Rows go to a temporary file in the destination directory which replaces
/// `path` only once everything is written. Returns the number of data rows.
pub fn write_csv<P: AsRef<Path>>(
    dataset: &Dataset,
    path: P,
    options: &CsvOptions,
) -> Result<usize, OutputError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    let rows = write_to(dataset, &mut temp, options)?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    info!("Wrote {} rows to {}", rows, path.display());
    Ok(rows)
}

/// Write `dataset` as delimited text to any writer
pub fn write_to<W: Write>(
    dataset: &Dataset,
    writer: W,
    options: &CsvOptions,
) -> Result<usize, OutputError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    let mut header: Vec<&str> = dataset.labels().collect();
    header.push(&options.well_column);
    csv_writer.write_record(&header)?;

    let mut rows = 0;
    let mut record = Vec::with_capacity(header.len());
    for row in dataset.rows() {
        record.clear();
        record.extend(row.values.iter().map(|value| value.map(format_value).unwrap_or_default()));
        record.push(row.well.to_string());
        csv_writer.write_record(&record)?;
        rows += 1;
    }

    csv_writer.flush()?;
    Ok(rows)
}

/// Integral values keep one decimal place (`512.0`); NaN is written as an
/// empty field like a missing value.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
