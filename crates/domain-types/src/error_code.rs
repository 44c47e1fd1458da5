/// Implemented by every typed error enum in the core so adapters can
/// extract a stable machine-readable code without matching on variants.
///
/// Mirrors the `ErrorCode` convention the teacher applies to its
/// per-use-case error enums: SCREAMING_SNAKE_CASE, entity-prefixed where
/// relevant.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}
