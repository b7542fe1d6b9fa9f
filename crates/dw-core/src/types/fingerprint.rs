//! Content fingerprints.
//!
//! A [`Fingerprint`] is the SHA-256 digest of a file's bytes. Equality of
//! fingerprints is the only change test docwatch performs; timestamps are
//! never consulted.

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 digest of a file's content.
///
/// # Examples
///
/// ```
/// use dw_core::Fingerprint;
///
/// let a = Fingerprint::of(b"fn a(){}");
/// let b = Fingerprint::of(b"fn a(){}");
/// assert_eq!(a, b);
/// assert_ne!(a, Fingerprint::of(b"fn a(){ 1 }"));
/// assert_eq!(a.to_hex().len(), 64);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Computes the fingerprint of `content`.
    #[must_use]
    pub fn of(content: impl AsRef<[u8]>) -> Self {
        let digest = Sha256::digest(content.as_ref());
        let mut bytes = [0_u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Renders the digest as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Returns the first 12 hex characters, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(12);
        hex
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.short()).finish()
    }
}
