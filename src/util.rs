// Small shared helpers: test-gated tracing and the C-library-style
// numeric prefix decoders used for literal decoding and the string
// conversion built-ins.

use regex::Regex;


#[macro_export]
macro_rules! trace(
    ( $($thing:expr),* ) => { if cfg!(test) { println! { $($thing),* } } };
);


lazy_static! {
    static ref INT_PREFIX: Regex = Regex::new(
        r"^[ \t]*([+-]?[0-9]+)"
    ).unwrap();

    static ref REAL_PREFIX: Regex = Regex::new(
        r"^[ \t]*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)"
    ).unwrap();
}


// Decode the longest leading integer prefix of `text`, ignoring
// leading blanks. Yields 0 when no digits are found, like atoi.
pub fn atoi(text: &str) -> i64 {
    match INT_PREFIX.captures(text) {
        Some(caps) => caps[1].parse().unwrap_or(0),
        None => 0,
    }
}

// Decode the longest leading floating-point prefix of `text`,
// ignoring leading blanks. Yields 0.0 when no number is found.
pub fn atof(text: &str) -> f64 {
    match REAL_PREFIX.captures(text) {
        Some(caps) => caps[1].parse().unwrap_or(0.0),
        None => 0.0,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoi() {
        assert_eq!(atoi("42"), 42);
        assert_eq!(atoi("  42"), 42);
        assert_eq!(atoi("42abc"), 42);
        assert_eq!(atoi("-5"), -5);
        assert_eq!(atoi("+5"), 5);
        assert_eq!(atoi("abc"), 0);
        assert_eq!(atoi(""), 0);
        assert_eq!(atoi("3.9"), 3);
    }

    #[test]
    fn test_atof() {
        assert_eq!(atof("3.14"), 3.14);
        assert_eq!(atof("  3.14xyz"), 3.14);
        assert_eq!(atof(".5"), 0.5);
        assert_eq!(atof("7"), 7.0);
        assert_eq!(atof("7."), 7.0);
        assert_eq!(atof("-2.5"), -2.5);
        assert_eq!(atof("1e3"), 1000.0);
        assert_eq!(atof("xyz"), 0.0);
        assert_eq!(atof(""), 0.0);
    }
}
