pub mod core;
/// Built-in function implementations.
///
/// Contains the eight `$` builtins: tree navigation, string slicing and
/// searching, selection, randomness, and character codes.
pub mod builtin;
