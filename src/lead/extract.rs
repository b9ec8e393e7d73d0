use once_cell::sync::Lazy;
use regex::Regex;

/// Optional `+` followed by a contiguous run of 8 to 15 decimal digits
/// (ASCII, Arabic-Indic or Extended Arabic-Indic). Separators such as spaces
/// or dashes break the run.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+?[0-9\x{0660}-\x{0669}\x{06F0}-\x{06F9}]{8,15}").expect(
        "phone pattern is a valid regex"
    )
});

/// Returns the leftmost phone-like substring of `text`, if any.
///
/// Purely syntactic: no country-code or length-per-country validation. A digit
/// run longer than 15 yields its first 15 digits.
pub fn extract_phone(text: &str) -> Option<&str> {
    PHONE_PATTERN.find(text).map(|m| m.as_str())
}

/// Value of a decimal digit in any script the extractor accepts.
pub fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '\u{0660}'..='\u{0669}' => Some((c as u32) - 0x0660),
        '\u{06F0}'..='\u{06F9}' => Some((c as u32) - 0x06f0),
        _ => None,
    }
}

/// Keeps only the digits, folded to ASCII, e.g. `+968 9123-4567` → `96891234567`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter_map(digit_value)
        .filter_map(|d| char::from_digit(d, 10))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_plus_prefixed_number() {
        assert_eq!(extract_phone("my whatsapp is +96891234567 thanks"), Some("+96891234567"));
    }

    #[test]
    fn finds_bare_digit_run() {
        assert_eq!(extract_phone("call 91234567"), Some("91234567"));
    }

    #[test]
    fn returns_leftmost_match_only() {
        assert_eq!(extract_phone("first 12345678 then +4915112345678"), Some("12345678"));
    }

    #[test]
    fn short_runs_do_not_match() {
        assert_eq!(extract_phone("we are 4 people for 7 days, budget 1200"), None);
        assert_eq!(extract_phone("1234567"), None);
        assert_eq!(extract_phone(""), None);
    }

    #[test]
    fn separators_break_the_run() {
        assert_eq!(extract_phone("+968 9123 4567"), None);
        assert_eq!(extract_phone("968-9123-4567"), None);
    }

    #[test]
    fn long_runs_are_capped_at_fifteen_digits() {
        assert_eq!(extract_phone("12345678901234567890"), Some("123456789012345"));
    }

    #[test]
    fn plus_without_enough_digits_falls_through_to_later_run() {
        assert_eq!(extract_phone("+12 then 87654321"), Some("87654321"));
    }

    #[test]
    fn finds_arabic_indic_numbers() {
        assert_eq!(extract_phone("رقمي ٩٦٨٩١٢٣٤٥٦٧"), Some("٩٦٨٩١٢٣٤٥٦٧"));
        assert_eq!(extract_phone("شماره +۹۶۸۹۱۲۳۴۵۶۷"), Some("+۹۶۸۹۱۲۳۴۵۶۷"));
        assert_eq!(extract_phone("٩١٢٣٤٥٦"), None);
    }

    #[test]
    fn normalize_keeps_only_digits() {
        assert_eq!(normalize_phone("+96891234567"), "96891234567");
        assert_eq!(normalize_phone("+968 9123-4567"), "96891234567");
        assert_eq!(normalize_phone("n/a"), "");
    }

    #[test]
    fn normalize_folds_arabic_indic_digits_to_ascii() {
        assert_eq!(normalize_phone("٩٦٨٩١٢٣٤٥٦٧"), "96891234567");
        assert_eq!(normalize_phone("+۹۶۸۹۱۲۳۴۵۶۷"), "96891234567");
        assert_eq!(normalize_phone("+٩٦٨ 9123"), "9689123");
    }

    #[test]
    fn digit_value_covers_each_script() {
        assert_eq!(digit_value('7'), Some(7));
        assert_eq!(digit_value('٧'), Some(7));
        assert_eq!(digit_value('۷'), Some(7));
        assert_eq!(digit_value('x'), None);
    }
}
