//! Default colors for labels created without one.
//!
//! Label text is trimmed and lowercased before hashing, so "Bug" and " bug"
//! land on the same swatch.

/// Label swatches (6-char hex without `#`), readable behind white text.
const SWATCHES: &[&str] = &[
    "61bd4f", // green
    "f2d600", // yellow
    "ff9f1a", // orange
    "eb5a46", // red
    "c377e0", // purple
    "0079bf", // blue
    "00c2e0", // sky
    "51e898", // lime
    "ff78cb", // pink
    "344563", // black
    "b3bac5", // grey
    "8f7ee7", // lavender
];

/// Return a deterministic swatch for a label text.
pub fn auto_color(text: &str) -> &'static str {
    let key = text.trim().to_lowercase();
    let idx = (fnv1a(&key) as usize) % SWATCHES.len();
    SWATCHES[idx]
}

/// True for a 6-digit hex color, with or without a leading `#`.
pub fn is_hex_color(color: &str) -> bool {
    let hex = color.strip_prefix('#').unwrap_or(color);
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// FNV-1a hash (32-bit) for short strings.
fn fnv1a(s: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in s.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}
