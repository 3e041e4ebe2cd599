use super::Error;
use crate::schema::ModelId;

/// Error when a type carries no model metadata in the schema.
///
/// This occurs when:
/// - A field resolver is asked for a model type that was never registered
/// - A mapping is built against a destination model missing from the schema
/// - A query references a model id from a different schema
#[derive(Debug)]
pub(super) struct MetadataUnavailable {
    subject: Subject,
}

#[derive(Debug)]
enum Subject {
    Type(Box<str>),
    Id(ModelId),
}

impl std::error::Error for MetadataUnavailable {}

impl core::fmt::Display for MetadataUnavailable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.subject {
            Subject::Type(name) => {
                write!(f, "metadata unavailable: `{name}` is not a registered model")
            }
            Subject::Id(id) => write!(f, "metadata unavailable: no model registered for {id:?}"),
        }
    }
}

impl Error {
    /// Creates a metadata unavailable error for the named type.
    pub fn metadata_unavailable(type_name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MetadataUnavailable(MetadataUnavailable {
            subject: Subject::Type(type_name.into().into()),
        }))
    }

    /// Creates a metadata unavailable error for a model id that is not in the schema.
    pub fn metadata_unavailable_for_id(id: ModelId) -> Error {
        Error::from(super::ErrorKind::MetadataUnavailable(MetadataUnavailable {
            subject: Subject::Id(id),
        }))
    }

    /// Returns `true` if this error is a metadata unavailable error.
    pub fn is_metadata_unavailable(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MetadataUnavailable(_))
    }
}
