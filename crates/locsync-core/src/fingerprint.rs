//! Content fingerprint used to detect drift between an imported translation
//! and the source text it was recorded against.
//!
//! The checksum is CRC-32 (IEEE, reflected 0xEDB88320) over the Unicode code
//! points of the text, each written as a 4-byte little-endian value, i.e. the
//! UTF-32LE encoding. Working on code points keeps the value independent of
//! how the text was encoded on the way in (UTF-8, UTF-16 surrogate pairs).

/// Fingerprint of `text`. The empty string maps to the CRC of zero bytes (0).
pub fn fingerprint(text: &str) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    for ch in text.chars() {
        hasher.update(&u32::from(ch).to_le_bytes());
    }
    hasher.finalize()
}
