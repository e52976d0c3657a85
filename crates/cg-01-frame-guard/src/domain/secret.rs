//! # Shared Secret Key
//!
//! The pre-shared symmetric key used by both the sender and the relay.
//!
//! ## Security
//!
//! - The key bytes are zeroed when the value is dropped.
//! - `Debug` never prints the key.
//! - The key is immutable for the lifetime of the process.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::KeyError;

/// Demo key shipped with the reference sender. Accepted, but the runtime
/// warns loudly when it is in use.
pub const DEMO_SECRET_KEY: &[u8] = b"super_secret_demo_key";

/// Opaque shared key that zeroizes on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    inner: Vec<u8>,
}

impl SecretKey {
    /// Wrap key bytes.
    ///
    /// # Errors
    /// `KeyError::Empty` for a zero-length key.
    pub fn new(bytes: Vec<u8>) -> Result<Self, KeyError> {
        if bytes.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Self { inner: bytes })
    }

    /// Copy key bytes out of a slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        Self::new(bytes.to_vec())
    }

    /// The demo key from the reference setup.
    pub fn demo() -> Self {
        Self {
            inner: DEMO_SECRET_KEY.to_vec(),
        }
    }

    /// Raw key bytes. Hand straight to the MAC; do not keep copies.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_demo_key(&self) -> bool {
        self.inner == DEMO_SECRET_KEY
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey(***, {} bytes)", self.inner.len())
    }
}
