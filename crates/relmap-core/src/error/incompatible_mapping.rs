use super::Error;

/// Error when a mapping's source model cannot accept the rows it was given.
///
/// Raised before any rows are fetched.
#[derive(Debug)]
pub(super) struct IncompatibleMapping {
    mapping: Box<str>,
    from_model: Box<str>,
    rows_model: Box<str>,
}

impl std::error::Error for IncompatibleMapping {}

impl core::fmt::Display for IncompatibleMapping {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "incompatible mapping: `{}` maps `{}` and cannot map rows of `{}`",
            self.mapping, self.from_model, self.rows_model
        )
    }
}

impl Error {
    /// Creates an incompatible mapping error.
    pub fn incompatible_mapping(
        mapping: impl Into<String>,
        from_model: impl Into<String>,
        rows_model: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::IncompatibleMapping(IncompatibleMapping {
            mapping: mapping.into().into(),
            from_model: from_model.into().into(),
            rows_model: rows_model.into().into(),
        }))
    }

    /// Returns `true` if this error is an incompatible mapping error.
    pub fn is_incompatible_mapping(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IncompatibleMapping(_))
    }
}
