//! Live phone-number masking for text rows in phone input mode.
//!
//! The mask is reapplied on every keystroke, so the stored value always looks
//! like `(773) 123-4567` while the user types digits.

/// Format a raw phone-number string as `(DDD) DDD-DDDD`.
///
/// Whitespace, hyphens, and parentheses are stripped first, so feeding an
/// already-masked value back in is safe. Input is capped at ten digits.
///
/// `should_remove_last_digit` drops the final cleaned character before
/// reformatting. Deletion callbacks pass `true`: the previous display value
/// still contains mask punctuation, and the character the user removed must
/// come off the digit string, not the punctuated one.
///
/// Partial input below seven digits renders as `(DDD) D...`; below four
/// characters the cleaned input is returned unchanged. Cleaned input that is
/// not purely digits is also returned unchanged.
pub fn format_phone_number(raw: &str, should_remove_last_digit: bool) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut number: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .take(10)
        .collect();

    if should_remove_last_digit {
        number.pop();
    }

    if !number.chars().all(|c| c.is_ascii_digit()) {
        return number;
    }

    if number.len() < 7 {
        if number.len() < 4 {
            return number;
        }
        let (area, rest) = number.split_at(3);
        format!("({area}) {rest}")
    } else {
        let (area, rest) = number.split_at(3);
        let (prefix, line) = rest.split_at(3);
        format!("({area}) {prefix}-{line}")
    }
}

/// Accepts only digits (zip code input mode).
pub fn digit_validator(c: char) -> bool {
    c.is_ascii_digit()
}

/// Accepts digits and the punctuation the mask itself produces.
pub fn phone_validator(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_number() {
        assert_eq!(format_phone_number("7731234567", false), "(773) 123-4567");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_phone_number("", false), "");
    }

    #[test]
    fn test_strips_mask_punctuation() {
        assert_eq!(
            format_phone_number("(773) 123-4567", false),
            "(773) 123-4567"
        );
    }

    #[test]
    fn test_truncates_to_ten_digits() {
        assert_eq!(
            format_phone_number("773123456789", false),
            "(773) 123-4567"
        );
    }

    #[test]
    fn test_partial_number() {
        assert_eq!(format_phone_number("77312", false), "(773) 12");
    }

    #[test]
    fn test_short_input_unchanged() {
        assert_eq!(format_phone_number("77", false), "77");
        assert_eq!(format_phone_number("773", false), "773");
    }

    #[test]
    fn test_deletion_removes_logical_digit() {
        // Simulates deleting one character after "(773) 1234-5" was shown:
        // the last digit comes off the cleaned string before reformatting.
        assert_eq!(format_phone_number("77312345", true), "(773) 123-4");
    }

    #[test]
    fn test_deletion_from_masked_value() {
        assert_eq!(format_phone_number("(773) 12", true), "(773) 1");
    }

    #[test]
    fn test_non_digit_residue_unchanged() {
        assert_eq!(format_phone_number("773abc1", false), "773abc1");
    }

    #[test]
    fn test_digit_validator() {
        assert!(digit_validator('0'));
        assert!(digit_validator('9'));
        assert!(!digit_validator('a'));
        assert!(!digit_validator('-'));
    }

    #[test]
    fn test_phone_validator() {
        assert!(phone_validator('5'));
        assert!(phone_validator('('));
        assert!(phone_validator('-'));
        assert!(!phone_validator('x'));
    }
}
