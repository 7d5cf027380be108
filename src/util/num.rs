/// Reads a number from the longest numeric prefix of a string.
///
/// The accepted prefix is: an optional sign, decimal digits, an optional
/// fractional part, and an optional `E` exponent. Whatever follows the prefix
/// is ignored, and a string with no numeric prefix at all coerces to `0`.
/// This is the single conversion used everywhere a value is treated
/// numerically, so `"2abc" + 1` is `3` and `"" < 1` compares `0 < 1`.
///
/// # Parameters
/// - `text`: The string to read a number from.
///
/// # Returns
/// The numeric value of the longest valid prefix, or `0.0`.
///
/// # Example
/// ```
/// use mumble::util::num::string_to_number;
///
/// assert_eq!(string_to_number("12.5rest"), 12.5);
/// assert_eq!(string_to_number("-3E2"), -300.0);
/// assert_eq!(string_to_number("abc"), 0.0);
/// assert_eq!(string_to_number(""), 0.0);
/// ```
#[must_use]
pub fn string_to_number(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let mut digits = 0;
    while matches!(bytes.get(pos), Some(b) if b.is_ascii_digit()) {
        pos += 1;
        digits += 1;
    }

    if matches!(bytes.get(pos), Some(b'.')) {
        let mut frac = pos + 1;
        while matches!(bytes.get(frac), Some(b) if b.is_ascii_digit()) {
            frac += 1;
            digits += 1;
        }
        // A bare dot only extends the prefix when digits surround it.
        if digits > 0 {
            pos = frac;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    let mut end = pos;
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let mut exp_digits = 0;
        while matches!(bytes.get(exp), Some(b) if b.is_ascii_digit()) {
            exp += 1;
            exp_digits += 1;
        }
        if exp_digits > 0 {
            end = exp;
        }
    }

    text[..end].parse().unwrap_or(0.0)
}

/// Renders a number in its canonical string form.
///
/// Integers print without a decimal point, everything else prints as the
/// shortest decimal that round-trips, and negative zero collapses to `"0"`.
/// Scientific notation is never produced.
///
/// # Parameters
/// - `value`: The number to render.
///
/// # Returns
/// The canonical text of `value`.
///
/// # Example
/// ```
/// use mumble::util::num::number_to_string;
///
/// assert_eq!(number_to_string(21.0), "21");
/// assert_eq!(number_to_string(2.5), "2.5");
/// assert_eq!(number_to_string(-0.0), "0");
/// ```
#[must_use]
pub fn number_to_string(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}

/// Tests whether a string is a number in canonical form.
///
/// A key collates numerically only when coercing it to a number and back
/// reproduces it exactly, so `"10"` is numeric while `"1.0"` and `"01"` are
/// ordinary strings.
///
/// # Parameters
/// - `text`: The candidate key.
///
/// # Returns
/// - `Some(f64)`: The numeric value, when `text` is canonical.
/// - `None`: Otherwise.
#[must_use]
pub fn canonical_number(text: &str) -> Option<f64> {
    let value = string_to_number(text);
    if number_to_string(value) == text {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        assert_eq!(string_to_number("123abc"), 123.0);
        assert_eq!(string_to_number("1E"), 1.0);
        assert_eq!(string_to_number("1e-2x"), 0.01);
        assert_eq!(string_to_number(".5"), 0.5);
        assert_eq!(string_to_number("-.5"), -0.5);
        assert_eq!(string_to_number("--5"), 0.0);
        assert_eq!(string_to_number("12."), 12.0);
    }

    #[test]
    fn canonical_rendering() {
        assert_eq!(number_to_string(1e21), "1000000000000000000000");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(-7.0), "-7");
    }

    #[test]
    fn canonical_numbers_round_trip() {
        assert_eq!(canonical_number("10"), Some(10.0));
        assert_eq!(canonical_number("-2.5"), Some(-2.5));
        assert_eq!(canonical_number("1.0"), None);
        assert_eq!(canonical_number("01"), None);
        assert_eq!(canonical_number(""), None);
        assert_eq!(canonical_number("abc"), None);
    }
}
