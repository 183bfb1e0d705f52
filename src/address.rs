//! Mailbox address validation functions.

/// Check if a given string is a valid mailbox local part.
pub fn is_valid_local_part(address: &str) -> bool {
    // Between 3 and 30 characters
    if address.len() < 3 || address.len() > 30 {
        return false;
    }

    // Must start and end with a lowercase letter or digit
    let first = address.chars().next();
    let last = address.chars().last();
    let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !edge_ok(first) || !edge_ok(last) {
        return false;
    }

    // Separators may not repeat
    if address.contains("..") || address.contains("--") || address.contains("__") {
        return false;
    }

    // Check that every character is a lowercase letter, digit or separator
    address
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_'))
}
