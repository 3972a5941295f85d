use thiserror::Error;

/// Result type for htmlstruct operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for htmlstruct operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed field annotation
    #[error(transparent)]
    TagSyntax(#[from] TagSyntaxError),

    /// HTML input rejected by the document parser
    #[error("parsing html: {message}")]
    Parse { message: String },

    /// Selector that failed to compile or evaluate
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// Value could not be stored in a record field
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// Assignment failure raised while building an entity
    #[error("setting field {field}: {source}")]
    Extraction {
        field: String,
        #[source]
        source: AssignmentError,
    },
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a selector error
    pub fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Wraps an assignment failure with the field being built
    pub fn extraction(field: impl Into<String>, source: AssignmentError) -> Self {
        Self::Extraction {
            field: field.into(),
            source,
        }
    }

    /// Returns the assignment failure carried by this error, if any
    pub fn assignment_error(&self) -> Option<&AssignmentError> {
        match self {
            Self::Assignment(err) | Self::Extraction { source: err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Annotation string that does not follow the `key:"value"` grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed tag `{tag}` at offset {offset}: {message}")]
pub struct TagSyntaxError {
    /// The full annotation string
    pub tag: String,
    /// Byte offset where parsing stopped
    pub offset: usize,
    /// What the parser expected
    pub message: String,
}

impl TagSyntaxError {
    pub fn new(tag: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            offset,
            message: message.into(),
        }
    }
}

/// Failure to store a value into a named record field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// The value's type is not assignable to the field's declared type
    #[error("cannot assign {value_type} to {field_type}")]
    TypeMismatch {
        field: String,
        value_type: &'static str,
        field_type: &'static str,
    },

    /// The record has no field with this name
    #[error("no field named {field}")]
    UnknownField { field: String },
}

impl AssignmentError {
    /// Creates a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        value_type: &'static str,
        field_type: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            value_type,
            field_type,
        }
    }

    /// Creates an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Name of the field the assignment targeted
    pub fn field(&self) -> &str {
        match self {
            Self::TypeMismatch { field, .. } | Self::UnknownField { field } => field,
        }
    }
}
