//! Id hashing for vector index point ids.
//!
//! Candidate ids are free-form strings, but qdrant point ids are numeric.
//! We key points by a truncated BLAKE3 hash of the candidate id and keep the
//! string id in the payload. 64 bits is plenty at catalog cardinality; a
//! collision would shadow one point in the index, never corrupt a session.

/// Computes a 64-bit id from arbitrary bytes (BLAKE3, truncated).
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Point id for a candidate id string.
#[inline]
pub fn hash_candidate_id(id: &str) -> u64 {
    hash_to_u64(id.as_bytes())
}
