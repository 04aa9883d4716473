use blake3::Hasher;

/// Stable 32-byte key for a piece of text (exact-tier cache key).
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Identity of a candidate chunk: its source document plus its content.
///
/// The source is length-prefixed, so no split of the same bytes between source and content
/// collides. Truncated to 64 bits; a rare collision costs at most one dropped duplicate.
#[inline]
pub fn hash_candidate(source: &str, content: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(&(source.len() as u64).to_le_bytes());
    hasher.update(source.as_bytes());
    hasher.update(content.as_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
