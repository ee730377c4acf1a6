//! Reproducible sub-seed derivation.
//!
//! Every random decision an engine makes flows from a [`Xorshift64`] seeded
//! with [`derive_seed`]. The root seed, a label (conventionally the engine
//! name), and an optional frame index are hashed with SHA-256, so two engines
//! run with the same root seed draw independent streams, and each frame of
//! an animation draws its own stream regardless of rendering order.
//!
//! [`Xorshift64`]: crate::prng::Xorshift64

use sha2::{Digest, Sha256};

/// Derives a reproducible 64-bit sub-seed from `root`, `label`, and an
/// optional `frame` index.
///
/// The digest input is `root` as 8 little-endian bytes, then `frame` as 8
/// little-endian bytes when present, then the UTF-8 bytes of `label`. The
/// first 8 digest bytes are read back as a little-endian `i64`.
pub fn derive_seed(root: i64, label: &str, frame: Option<u64>) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(root.to_le_bytes());
    if let Some(frame) = frame {
        hasher.update(frame.to_le_bytes());
    }
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    i64::from_le_bytes(head)
}
