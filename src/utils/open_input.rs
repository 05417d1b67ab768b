use crate::Error;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Opens an input file for buffered, streaming reads.
///
/// Files ending in `.gz` are decompressed on the fly, so a compressed corpus is never
/// inflated in memory.
///
/// # Errors
/// Returns a configuration error if the file does not exist, or an IO error if it cannot
/// be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    if !path.is_file() {
        return Err(Error::ConfigError(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)?;

    let is_gzip = path
        .extension()
        .map(|extension| extension.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gzip {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
