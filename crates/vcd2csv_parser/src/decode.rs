//! Display decoding of raw signal values.

/// Decodes a raw value for display.
///
/// If the value contains any character other than `0` or `1`, the first such
/// character is returned on its own (`"1x01"` gives `"x"`); the binary digits
/// around it are dropped. Otherwise the value is read as an unsigned binary
/// number of any length and rendered as lowercase hexadecimal without prefix
/// or leading zeros. Zero and the empty string decode to `"0"`.
pub fn decode(raw: &str) -> String {
    if let Some(c) = raw.chars().find(|&c| c != '0' && c != '1') {
        return c.to_string();
    }

    let bits = raw.trim_start_matches('0').as_bytes();
    if bits.is_empty() {
        return "0".to_string();
    }

    // The leading nibble may be short; the rest are exactly four bits each.
    let head = bits.len() % 4;
    let mut out = String::with_capacity(bits.len() / 4 + 1);
    if head != 0 {
        out.push(nibble_digit(&bits[..head]));
    }
    for chunk in bits[head..].chunks(4) {
        out.push(nibble_digit(chunk));
    }
    out
}

fn nibble_digit(bits: &[u8]) -> char {
    let n = bits
        .iter()
        .fold(0u32, |acc, &b| (acc << 1) | u32::from(b == b'1'));
    char::from_digit(n, 16).unwrap_or('?')
}
