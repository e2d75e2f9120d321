//! SHA-256 checksums for repository artifacts.
//!
//! Repositories may publish a `<file>.sha256` sidecar next to each artifact.
//! The sidecar holds the lowercase hex digest, optionally followed by
//! whitespace and a file name.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Extension appended to an artifact path to find its checksum sidecar.
pub const SIDECAR_EXTENSION: &str = "sha256";

/// A content hash (SHA-256 hex digest).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Compute the SHA-256 hash of the given data.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex_encode(&hasher.finalize()))
    }

    /// Hash a file without loading it into memory.
    pub fn compute_file(path: &Path) -> io::Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(ContentHash(hex_encode(&hasher.finalize())))
    }

    /// Parse the digest from sidecar contents. Returns `None` when the first
    /// token is not a 64-character hex string.
    pub fn parse_sidecar(contents: &str) -> Option<Self> {
        let token = contents.split_whitespace().next()?;
        if token.len() == 64 && token.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(ContentHash(token.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Get the hex string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that the given data matches this hash.
    pub fn verify(&self, data: &[u8]) -> bool {
        ContentHash::compute(data) == *self
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path of the checksum sidecar for `artifact_path`.
pub fn sidecar_path(artifact_path: &Path) -> PathBuf {
    let mut name = artifact_path.as_os_str().to_owned();
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

/// Read the published checksum for `artifact_path`, if a sidecar exists.
pub fn read_sidecar(artifact_path: &Path) -> io::Result<Option<ContentHash>> {
    let path = sidecar_path(artifact_path);
    if !path.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)?;
    Ok(ContentHash::parse_sidecar(&contents))
}

/// Encode bytes as lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
