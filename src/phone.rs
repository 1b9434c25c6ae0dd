/// Number of trailing digits that make up a phone key.
pub const PHONE_KEY_LEN: usize = 10;

/// Reduce a phone string to its rightmost 10 digits.
///
/// Every character that is not an ASCII digit is dropped. The result may be
/// shorter than 10 characters (or empty); use [`is_valid_key`] before
/// treating it as a store key.
pub fn normalize(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(PHONE_KEY_LEN);
    digits[start..].iter().collect()
}

/// True when `key` is exactly 10 ASCII digits.
pub fn is_valid_key(key: &str) -> bool {
    key.len() == PHONE_KEY_LEN && key.bytes().all(|b| b.is_ascii_digit())
}
