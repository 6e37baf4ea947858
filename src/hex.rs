const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Uppercase ASCII hex digit for the low nibble of `value`.
pub fn encode_nibble(value: u8) -> u8 {
    HEX_DIGITS[(value & 0x0F) as usize]
}

/// Two hex digits for `value`, high nibble first.
pub fn encode_byte(value: u8) -> [u8; 2] {
    [encode_nibble(value >> 4), encode_nibble(value)]
}

/// Value of an ASCII hex digit.
///
/// There is no validation: anything that isn't `'0'..='9'` goes through the
/// letter path, so `a-f`/`A-F` both land on 10..=15 and every other byte
/// wraps to some garbage nibble.
pub fn decode_hex_digit(c: u8) -> u8 {
    if c.is_ascii_digit() {
        c - b'0'
    } else {
        (c & 0x5F).wrapping_sub(b'A').wrapping_add(10)
    }
}
