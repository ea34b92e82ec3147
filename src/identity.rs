//! Deterministic fallback identifiers.
//!
//! Records built without an explicit id derive one from their defining
//! fields. The derivation must give the same id on every run and platform, so
//! it hashes a canonical byte encoding with SHA-256 instead of relying on
//! `std::hash`:
//!
//! - every field starts with a one-byte tag (`0` absent, `1` present)
//! - strings are a big-endian `u64` length followed by UTF-8 bytes
//! - integers are big-endian `i64`, floats their IEEE-754 bits big-endian
//!
//! The id is the first eight digest bytes read as a big-endian `u64`, masked
//! to 63 bits. Zero becomes one so the result is always a valid (> 0) id.

use sha2::{Digest, Sha256};

const ABSENT: u8 = 0;
const PRESENT: u8 = 1;

pub struct IdentityHasher {
    digest: Sha256,
}

impl Default for IdentityHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityHasher {
    pub fn new() -> Self {
        Self {
            digest: Sha256::new(),
        }
    }

    pub fn str(&mut self, value: &str) -> &mut Self {
        self.digest.update([PRESENT]);
        self.digest.update((value.len() as u64).to_be_bytes());
        self.digest.update(value.as_bytes());
        self
    }

    pub fn opt_str(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => self.str(v),
            None => self.absent(),
        }
    }

    pub fn int(&mut self, value: i64) -> &mut Self {
        self.digest.update([PRESENT]);
        self.digest.update(value.to_be_bytes());
        self
    }

    pub fn opt_int(&mut self, value: Option<i64>) -> &mut Self {
        match value {
            Some(v) => self.int(v),
            None => self.absent(),
        }
    }

    pub fn float(&mut self, value: f64) -> &mut Self {
        self.digest.update([PRESENT]);
        self.digest.update(value.to_bits().to_be_bytes());
        self
    }

    pub fn opt_float(&mut self, value: Option<f64>) -> &mut Self {
        match value {
            Some(v) => self.float(v),
            None => self.absent(),
        }
    }

    pub fn absent(&mut self) -> &mut Self {
        self.digest.update([ABSENT]);
        self
    }

    /// Consume the accumulated fields and produce a positive id.
    pub fn finish(&mut self) -> i64 {
        let bytes = std::mem::take(&mut self.digest).finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&bytes[..8]);
        let id = (u64::from_be_bytes(head) & (i64::MAX as u64)) as i64;
        if id == 0 {
            1
        } else {
            id
        }
    }
}
