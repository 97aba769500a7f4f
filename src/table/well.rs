//! Well identifiers from file names (`<anything>_<well>.<ext>`).

use std::path::Path;

use crate::error::NamingError;

/// Extract the well identifier from a file name.
///
/// Takes the segment after the last underscore and strips a literal
/// `.{extension}` suffix. The identifier is not validated further.
pub fn extract_well_id(file_name: &str, extension: &str) -> Result<String, NamingError> {
    let missing = || NamingError::MissingWell(file_name.to_string());

    let (_, last) = file_name.rsplit_once('_').ok_or_else(missing)?;
    let well = if extension.is_empty() {
        last
    } else {
        last.strip_suffix(&format!(".{}", extension)).unwrap_or(last)
    };

    if well.is_empty() {
        return Err(missing());
    }
    Ok(well.to_string())
}

/// [`extract_well_id`] applied to the final component of `path`
pub fn well_id_from_path(path: &Path, extension: &str) -> Result<String, NamingError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| NamingError::InvalidFileName(path.to_path_buf()))?;
    extract_well_id(file_name, extension)
}
