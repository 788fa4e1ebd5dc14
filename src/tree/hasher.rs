//! Sampled content fingerprints using SHA-256
//!
//! A fingerprint covers at most `SAMPLE_SIZE` bytes: the whole file when it is
//! smaller than that, otherwise a window of exactly `SAMPLE_SIZE` bytes centred
//! on the file's midpoint. Files that differ only outside the window share a
//! fingerprint.

use crate::error::ScanError;
use crate::types::{Fingerprint, FINGERPRINT_LEN};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Sample window size: 8 MiB
pub const SAMPLE_SIZE: u64 = 8 * 1024 * 1024;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Byte range `(offset, len)` hashed for a file of `file_size` bytes
pub fn sample_window(file_size: u64) -> (u64, u64) {
    if file_size >= SAMPLE_SIZE {
        (file_size / 2 - SAMPLE_SIZE / 2, SAMPLE_SIZE)
    } else {
        (0, file_size)
    }
}

/// Compute the fingerprint of the file at `path`
///
/// The file handle is dropped on every return path. Any open, seek or read
/// failure is returned; no partial digest is ever produced.
pub fn compute_file_fingerprint(path: &Path) -> Result<Fingerprint, ScanError> {
    let mut file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    let size = file.metadata().map_err(|e| ScanError::io(path, e))?.len();
    let (offset, len) = sample_window(size);

    if offset > 0 {
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| ScanError::io(path, e))?;
    }

    let mut hasher = Sha256::new();
    let mut reader = file.take(len);
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ScanError::io(path, e)),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(finalize(hasher))
}

/// Fingerprint of an in-memory sample, as if it were the sampled window
pub fn compute_sample_fingerprint(sample: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(sample);
    finalize(hasher)
}

fn finalize(hasher: Sha256) -> Fingerprint {
    let mut bytes = [0u8; FINGERPRINT_LEN];
    bytes.copy_from_slice(&hasher.finalize());
    Fingerprint::from_bytes(bytes)
}
