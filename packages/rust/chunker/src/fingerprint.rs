//! Per-chunk derived metadata: content hash and token estimate.

/// Words-to-tokens ratio used for display estimates.
const TOKENS_PER_WORD: f64 = 1.25;

/// Order-sensitive rolling hash of `content`, rendered in base 36.
///
/// `h = h * 31 + unit` over UTF-16 code units with 32-bit wrap-around; the
/// absolute value is rendered. Used for change detection and display only.
pub fn content_hash(content: &str) -> String {
    let mut h: i32 = 0;
    for unit in content.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    to_base36(h.unsigned_abs())
}

/// Approximate token count: words × 1.25, rounded, never below 1.
pub fn token_estimate(content: &str) -> u64 {
    let words = content.split_whitespace().count();
    let estimate = (words as f64 * TOKENS_PER_WORD).round() as u64;
    estimate.max(1)
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
