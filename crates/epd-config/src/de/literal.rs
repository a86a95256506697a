//! C-style integer literal parsing.

/// Parses an integer literal honoring its base prefix, similar to `strtol(_, _, 0)`.
///
/// Leading and trailing ASCII whitespace is ignored, and an optional sign is accepted. Recognized prefixes
/// are `0x` (hexadecimal), `0o` (octal), `0b` (binary) and a bare leading `0` (octal, as in C);
/// otherwise, the literal is decimal. Prefixes are case-insensitive. `_` is accepted as a separator
/// between digits. Unlike `strtol`, the entire string must be consumed.
///
/// Returns `None` if the string is not a valid literal or the value doesn't fit into `i64`.
///
/// # Examples
///
/// ```
/// use epd_config::de::parse_int_literal;
///
/// assert_eq!(parse_int_literal("0x76"), Some(118));
/// assert_eq!(parse_int_literal("0166"), Some(118));
/// assert_eq!(parse_int_literal("0o166"), Some(118));
/// assert_eq!(parse_int_literal("118"), Some(118));
/// assert_eq!(parse_int_literal("not-a-number"), None);
/// ```
pub fn parse_int_literal(s: &str) -> Option<i64> {
    let s = s.trim_matches(|ch: char| ch.is_ascii_whitespace());
    let (is_negative, unsigned) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };

    let (radix, digits) = if let Some(digits) = strip_prefix_ignore_case(unsigned, "0x") {
        (16, digits)
    } else if let Some(digits) = strip_prefix_ignore_case(unsigned, "0o") {
        (8, digits)
    } else if let Some(digits) = strip_prefix_ignore_case(unsigned, "0b") {
        (2, digits)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    // `from_str_radix()` accepts a sign, which must not be repeated after the prefix.
    if !digits.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }
    let digits: String = digits.chars().filter(|&ch| ch != '_').collect();
    let magnitude = i128::from(u64::from_str_radix(&digits, radix).ok()?);
    let value = if is_negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}
