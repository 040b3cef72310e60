/// Parse a user-supplied zip code.
///
/// Surrounding whitespace is ignored. Anything that is not an unsigned
/// integer (including the empty string) is rejected. Leading zeros are not
/// preserved; callers format the value back with `{:05}`.
pub fn parse_zip(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_zip() {
        assert_eq!(parse_zip("10001"), Some(10001));
        assert_eq!(parse_zip(" 90210\n"), Some(90210));
    }

    #[test]
    fn test_leading_zero_zip() {
        assert_eq!(parse_zip("02134"), Some(2134));
        assert_eq!(format!("{:05}", 2134), "02134");
    }

    #[test]
    fn test_invalid_zip() {
        assert_eq!(parse_zip("abc"), None);
        assert_eq!(parse_zip(""), None);
        assert_eq!(parse_zip("   "), None);
        assert_eq!(parse_zip("-1"), None);
        assert_eq!(parse_zip("100 01"), None);
        assert_eq!(parse_zip("99999999999"), None);
    }
}
