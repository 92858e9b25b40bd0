//! The single string hash used by both set variants.

/// Hashes a key with a base-31 polynomial over its UTF-8 bytes.
///
/// The result is deterministic across runs and platforms. The high half is
/// folded into the low half so that power-of-two tables, which only look at
/// the low bits, still see the contribution of every byte.
#[inline]
pub fn string_hash(key: &str) -> u64 {
    let h = key
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    u64::from(h ^ (h >> 16))
}

/// Maps a hash onto `0..capacity`. `capacity` must be a power of two.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as usize) & (capacity - 1)
}
