//! Join code generation and normalization.

use error::{AppError, Result};
use rand::Rng;

/// Length of every join code.
pub const JOIN_CODE_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Shown whenever a code does not resolve to a team.
pub const INVALID_CODE: &str = "Invalid team code.";

/// A fresh random code of uppercase letters and digits.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0 .. JOIN_CODE_LENGTH)
        .map(|_| char::from(ALPHABET[rng.gen_range(0 .. ALPHABET.len())]))
        .collect()
}

/// Trim and uppercase user input, rejecting anything that cannot be a code.
pub fn normalize(input: &str) -> Result<String> {
    let code = input.trim().to_ascii_uppercase();
    if code.len() != JOIN_CODE_LENGTH || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(AppError::validation(format!(
            "Team code must be {} letters or digits.",
            JOIN_CODE_LENGTH
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        for _ in 0 .. 200 {
            let code = generate();
            assert_eq!(code.len(), JOIN_CODE_LENGTH);
            assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()), "{}", code);
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  ab12cd ").unwrap(), "AB12CD");
        assert_eq!(normalize("XYZ789").unwrap(), "XYZ789");
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert!(normalize("ABC").is_err());
        assert!(normalize("ABCDEFG").is_err());
        assert!(normalize("AB-12C").is_err());
        assert!(normalize("").is_err());
        assert!(normalize("ÄB12CD").is_err());
    }
}
