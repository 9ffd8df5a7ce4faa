//! Input validation before extraction.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Default upper bound on input size (500 MiB).
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Check if bytes start with the PDF signature.
///
/// # Example
/// ```
/// use pdfdiff::validate::is_pdf_magic;
///
/// assert!(is_pdf_magic(b"%PDF-1.7\n"));
/// assert!(!is_pdf_magic(b"%PD"));
/// ```
pub fn is_pdf_magic(data: &[u8]) -> bool {
    data.len() >= PDF_MAGIC.len() && data.starts_with(PDF_MAGIC)
}

/// Validate in-memory input against a size limit and the PDF signature.
///
/// # Returns
/// * `Err(Error::FileTooLarge)` if the data exceeds `max_size`
/// * `Err(Error::UnknownFormat)` if the data is not a PDF
pub fn validate_bytes(data: &[u8], max_size: u64) -> Result<()> {
    let size = data.len() as u64;
    if size > max_size {
        return Err(Error::FileTooLarge {
            size,
            limit: max_size,
        });
    }

    if !is_pdf_magic(data) {
        return Err(Error::UnknownFormat);
    }

    Ok(())
}

/// Validate a PDF path and return its canonical form.
///
/// The path must exist, resolve (through symlinks) to a regular file with a
/// `.pdf` extension, be no larger than `max_size`, and start with `%PDF`.
///
/// # Example
/// ```no_run
/// use pdfdiff::validate::{validate_path, MAX_FILE_SIZE};
///
/// let path = validate_path("contract.pdf", MAX_FILE_SIZE).unwrap();
/// println!("{}", path.display());
/// ```
pub fn validate_path<P: AsRef<Path>>(path: P, max_size: u64) -> Result<PathBuf> {
    let path = path.as_ref().canonicalize()?;
    let metadata = path.metadata()?;

    if !metadata.is_file() {
        return Err(Error::NotAFile(path));
    }

    let has_pdf_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !has_pdf_extension {
        return Err(Error::InvalidExtension(path));
    }

    if metadata.len() > max_size {
        return Err(Error::FileTooLarge {
            size: metadata.len(),
            limit: max_size,
        });
    }

    let mut header = Vec::with_capacity(PDF_MAGIC.len());
    File::open(&path)?
        .take(PDF_MAGIC.len() as u64)
        .read_to_end(&mut header)?;
    if !is_pdf_magic(&header) {
        return Err(Error::UnknownFormat);
    }

    log::debug!(
        "Validated {} ({})",
        path.display(),
        format_file_size(metadata.len())
    );
    Ok(path)
}

/// Format a byte count for display: `1536` becomes `"1.5 KB"`.
///
/// Units are powers of 1024 up to GB; values are rounded to two decimals
/// with trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }
    let value = bytes as f64 / 1024u64.pow(exponent as u32) as f64;
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[exponent])
}
