use thiserror::Error;

/// Errors that can occur while assembling or reading a hybrid invoice PDF.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacturXError {
    /// A required input was absent or empty. Raised before any PDF work starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The resource loader has no entry for the named resource.
    #[error("resource not found: {0}")]
    MissingResource(String),

    /// The XMP template is not UTF-8 or still holds a placeholder after substitution.
    #[error("metadata template error: {0}")]
    Template(String),

    /// The invoice serializer failed to produce XML.
    #[error("invoice serialization failed: {0}")]
    Serialize(String),

    /// An object handle was used with an arena that did not issue it.
    #[error("object handle #{0} is not part of this object graph")]
    DanglingHandle(usize),

    /// The PDF lacks structure this crate depends on (no pages, broken filespec, ...).
    #[error("unexpected PDF structure: {0}")]
    Structure(String),

    /// No embedded file with a matching name was found.
    #[error("no embedded file named {0:?}")]
    AttachmentNotFound(String),

    /// Error raised by the underlying PDF library, passed through unchanged.
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),

    /// I/O error, passed through unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FacturXError {
    /// Whether this error was raised by input validation rather than by a
    /// downstream PDF, resource or I/O failure.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
