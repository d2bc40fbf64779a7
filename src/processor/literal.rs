//! Literal decoding shared by the parameter lowering code.

/// Strings wrapped in five tildes may contain single tildes.
const TILDE5: &str = "~~~~~";
/// Symbols wrapped in five double quotes are escaped IDS names.
const QUOTE5: &str = "\"\"\"\"\"";

/// Longest string the engine stores without truncation.
pub const MAX_STRING_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringError {
    /// No supported delimiter pair around the text.
    Unquoted,
    /// Decoded text still contains a `"`.
    EmbeddedQuote,
}

/// Parse an integer literal. Accepts an optional sign, `0x`/`0X` hex and
/// `0b`/`0B` binary prefixes; a leading `0` means octal only when
/// `octal` is set. Returns `None` if the text is not a number at all, in
/// which case the caller treats it as a symbol.
pub fn parse_number(text: &str, octal: bool) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, body) = if let Some(rest) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, rest)
    } else if let Some(rest) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, rest)
    } else if octal && digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // from_str_radix would accept a second sign after the prefix
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = i64::from_str_radix(body, radix).ok()?;
    Some(if negative { -value } else { value })
}

/// Strict signed decimal, as used for rectangle fields.
pub fn parse_plain(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok()
}

pub fn fits_i32(value: i64) -> bool {
    i32::try_from(value).is_ok()
}

/// Strip the quoting from a string argument.
pub fn unquote(text: &str) -> Result<String, StringError> {
    let inner = if text.len() >= 2 * TILDE5.len()
        && text.starts_with(TILDE5)
        && text.ends_with(TILDE5)
    {
        &text[TILDE5.len()..text.len() - TILDE5.len()]
    } else {
        let mut chars = text.chars();
        match (chars.next(), chars.next_back()) {
            (Some(open), Some(close)) if open == close && matches!(open, '"' | '~' | '%' | '#') => {
                &text[1..text.len() - 1]
            }
            _ => return Err(StringError::Unquoted),
        }
    };

    if inner.contains('"') {
        return Err(StringError::EmbeddedQuote);
    }
    Ok(inner.to_string())
}

/// Remove the `"""""` escape around a symbol, if present.
pub fn unescape_symbol(text: &str) -> &str {
    if text.len() >= 2 * QUOTE5.len() && text.starts_with(QUOTE5) && text.ends_with(QUOTE5) {
        &text[QUOTE5.len()..text.len() - QUOTE5.len()]
    } else {
        text
    }
}

/// Length that counts towards the engine limit; trailing blanks are dropped.
pub fn significant_len(text: &str) -> usize {
    text.trim_end().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        let test_cases = vec![
            ("0x1F", false, Some(31)),
            ("0X1f", true, Some(31)),
            ("0b101", false, Some(5)),
            ("0B11", true, Some(3)),
            ("017", true, Some(15)),
            ("017", false, Some(17)),
            ("0", true, Some(0)),
            ("-12", false, Some(-12)),
            ("+7", false, Some(7)),
            ("-0x10", false, Some(-16)),
            ("4294967295", false, Some(4_294_967_295)),
            ("089", true, None),
            ("0x", false, None),
            ("0x-1", false, None),
            ("0b102", false, None),
            ("PC", false, None),
            ("", false, None),
            ("-", false, None),
        ];

        for (input, octal, expected) in test_cases {
            assert_eq!(parse_number(input, octal), expected, "{input:?} octal={octal}");
        }
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_plain("-5"), Some(-5));
        assert_eq!(parse_plain(" 12 "), Some(12));
        assert_eq!(parse_plain("0x10"), None);
        assert_eq!(parse_plain("abc"), None);
    }

    #[test]
    fn test_unquote() {
        let test_cases = vec![
            ("\"abc\"", Ok("abc".to_string())),
            ("~abc~", Ok("abc".to_string())),
            ("%abc%", Ok("abc".to_string())),
            ("#abc#", Ok("abc".to_string())),
            ("\"\"", Ok(String::new())),
            ("~~~~~a~b~~~~~", Ok("a~b".to_string())),
            ("~~~~~~~~~~", Ok(String::new())),
            ("\"abc~", Err(StringError::Unquoted)),
            ("abc", Err(StringError::Unquoted)),
            ("\"", Err(StringError::Unquoted)),
            ("", Err(StringError::Unquoted)),
            ("~a\"b~", Err(StringError::EmbeddedQuote)),
        ];

        for (input, expected) in test_cases {
            assert_eq!(unquote(input), expected, "{input:?}");
        }
    }

    #[test]
    fn test_unescape_symbol() {
        assert_eq!(unescape_symbol("\"\"\"\"\"FOO\"\"\"\"\""), "FOO");
        assert_eq!(unescape_symbol("\"\"\"\"\"\"\"\"\"\""), "");
        assert_eq!(unescape_symbol("\"FOO\""), "\"FOO\"");
        assert_eq!(unescape_symbol("FOO"), "FOO");
    }

    #[test]
    fn test_limits() {
        assert!(fits_i32(i32::MAX as i64));
        assert!(!fits_i32(i32::MAX as i64 + 1));
        assert!(fits_i32(i32::MIN as i64));
        assert_eq!(significant_len("abc  "), 3);
        assert_eq!(significant_len("äö"), 2);
    }
}
