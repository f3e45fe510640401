//! Token cleanup and numeric classification.

/// Outcome of classifying a single token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenClass {
    /// The token holds a number that is kept.
    Value(f64),
    /// The token does not parse as a float.
    NonNumeric,
    /// The token parses, but to NaN.
    NaN,
}

/// Parse a token as a 64-bit float.
///
/// Accepts decimal and exponent notation with an optional sign, plus the
/// `inf`, `infinity` and `nan` spellings (case-insensitive). Returns `None`
/// for anything else, including the empty string. Digit-group underscores
/// such as `1_000` are not accepted; those tokens count as non-numeric.
///
/// # Examples
///
/// ```
/// use tsbench::extract::try_parse;
///
/// assert_eq!(try_parse("-2.0e3"), Some(-2000.0));
/// assert_eq!(try_parse("$12"), None);
/// assert!(try_parse("nan").unwrap().is_nan());
/// ```
pub fn try_parse(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

/// Strip `quote` from both ends of a token, then surrounding whitespace.
///
/// Whitespace inside the quotes is tolerated; whitespace outside them keeps
/// the quotes in place, so `" \"1\""` stays non-numeric.
pub fn clean_token(token: &str, quote: char) -> &str {
    token.trim_matches(quote).trim()
}

/// Classify a raw token: strip quotes, parse, then apply the NaN filter.
pub fn classify(token: &str, quote: char, drop_nan: bool) -> TokenClass {
    match try_parse(clean_token(token, quote)) {
        Some(v) if v.is_nan() && drop_nan => TokenClass::NaN,
        Some(v) => TokenClass::Value(v),
        None => TokenClass::NonNumeric,
    }
}
