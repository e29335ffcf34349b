//! BLAKE3 helpers for cache keys and catalog fingerprints.

use blake3::Hasher;

#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Computes a 64-bit hash of the input, truncated from the 256-bit BLAKE3 output.
///
/// Collisions are tolerable where this is used (embedding cache keys): a
/// collision returns another query's vector, which only perturbs ranking for
/// that one request. Use [`hash_text`] when the full digest is needed.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Cache key for a query embedding: model name and text, separated.
#[inline]
pub fn hash_embedding_key(model: &str, text: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(model.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Order-sensitive fingerprint over canonical catalog identifiers.
pub fn catalog_fingerprint<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Hasher::new();
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}
