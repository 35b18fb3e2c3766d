//! Cryptographically secure random number generator.

use rand_core::{CryptoRng, OsRng, RngCore};

/// Cryptographically secure random number generator.
///
/// This is a thin wrapper around `OsRng` and is the source used by every
/// convenience entry point that does not take an explicit RNG. It carries no
/// state, so creating one per call is free and safe across threads.
#[derive(Clone, Copy, Debug)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl Default for SecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

/// Fills a freshly allocated buffer of `len` random bytes.
pub fn random_bytes<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_has_requested_length() {
        let mut rng = SecureRng::new();
        assert_eq!(random_bytes(&mut rng, 32).len(), 32);
        assert!(random_bytes(&mut rng, 0).is_empty());
    }

    #[test]
    fn consecutive_draws_differ() {
        let mut rng = SecureRng::new();
        assert_ne!(random_bytes(&mut rng, 32), random_bytes(&mut rng, 32));
    }
}
