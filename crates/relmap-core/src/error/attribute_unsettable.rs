use super::Error;

/// Error when a destination object cannot be built by assigning attributes
/// one at a time.
///
/// Mappings recover from this by falling back to the destination's declared
/// constructor.
#[derive(Debug)]
pub(super) struct AttributeUnsettable {
    type_name: Box<str>,
    attr: Option<Box<str>>,
}

impl std::error::Error for AttributeUnsettable {}

impl core::fmt::Display for AttributeUnsettable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.attr {
            Some(attr) => write!(
                f,
                "attribute unsettable: cannot assign `{attr}` on `{}`",
                self.type_name
            ),
            None => write!(
                f,
                "attribute unsettable: `{}` cannot be built by attribute assignment",
                self.type_name
            ),
        }
    }
}

impl Error {
    /// Creates an attribute unsettable error.
    ///
    /// `attr` names the attribute that was rejected, if any.
    pub fn attribute_unsettable(type_name: impl Into<String>, attr: Option<&str>) -> Error {
        Error::from(super::ErrorKind::AttributeUnsettable(AttributeUnsettable {
            type_name: type_name.into().into(),
            attr: attr.map(Into::into),
        }))
    }

    /// Returns `true` if this error is an attribute unsettable error.
    pub fn is_attribute_unsettable(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AttributeUnsettable(_))
    }
}
