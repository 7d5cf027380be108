/// Runtime value representation.
///
/// Defines the `Scalar` and `MValue` types that model the language's data:
/// every value is either a string or a double, and every variable slot is
/// either a scalar, a sparse ordered tree of scalars, or an indirect
/// reference planted by a by-reference call argument.
pub mod core;

/// Key ordering for the sparse trees.
///
/// Defines the `CollationKey` wrapper that gives array subscripts their
/// collation order: canonically numeric keys first, ordered by value, then
/// all other keys ordered as strings.
pub mod collation;
