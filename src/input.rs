//! Size-bounded text input.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// Widest UTF-8 encoding of one character.
const MAX_UTF8_CHAR_BYTES: usize = 4;

/// Reads `path` as UTF-8, failing when it holds more than `max_chars` characters.
///
/// The file handle is released when this returns, on success or failure.
pub fn read_bounded(path: &Path, max_chars: usize) -> Result<String> {
    let file = File::open(path)?;
    read_bounded_from(BufReader::new(file), path, max_chars)
}

/// Reads at most enough bytes from `reader` to decide whether the input fits
/// in `max_chars` characters. `origin` only labels errors.
///
/// Reading stops after `max_chars * 4 + 1` bytes: that many bytes always
/// decode to more than `max_chars` characters, so there is no need to look
/// any further.
pub fn read_bounded_from<R: Read>(reader: R, origin: &Path, max_chars: usize) -> Result<String> {
    let byte_cap = max_chars
        .saturating_mul(MAX_UTF8_CHAR_BYTES)
        .saturating_add(1);
    let too_large = || Error::InputTooLarge {
        path: origin.to_path_buf(),
        max_chars,
    };

    let mut bytes = Vec::new();
    reader.take(byte_cap as u64).read_to_end(&mut bytes)?;
    if bytes.len() >= byte_cap {
        return Err(too_large());
    }

    let text = String::from_utf8(bytes).map_err(|err| Error::InvalidEncoding {
        path: origin.to_path_buf(),
        reason: err.to_string(),
    })?;
    let char_count = text.chars().count();
    if char_count > max_chars {
        return Err(too_large());
    }
    debug!(
        "Read {} characters from {} (budget {})",
        char_count,
        origin.display(),
        max_chars
    );
    Ok(text)
}
