//! Hashing utilities for graph fingerprints.

use sha2::{Digest, Sha256};

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Add an optional string component.
    pub fn update_opt(&mut self, opt: Option<&str>) -> &mut Self {
        match opt {
            Some(s) => {
                self.hasher.update(b"\x01");
                self.update_str(s);
            }
            None => {
                self.hasher.update(b"\x00");
            }
        }
        self
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finalize and return a short fingerprint (first 16 chars).
    pub fn finish_short(self) -> String {
        self.finish()[..16].to_string()
    }
}
