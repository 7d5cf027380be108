/// Numeric coercion helpers.
///
/// This module implements the string/number polymorphism at the heart of the
/// language: the longest-prefix rule for reading a number out of any string,
/// and the canonical rendering of a number back into a string. Collation and
/// truthiness are both defined in terms of these two functions, so they live
/// here rather than in the value module.
pub mod num;
