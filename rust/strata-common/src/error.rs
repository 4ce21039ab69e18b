use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn depth_mismatch(expected: usize, actual: usize) -> Error {
        Error(ErrorKind::DepthMismatch { expected, actual }.into())
    }

    pub fn duplicate_label(label: impl Into<String>) -> Error {
        Error(
            ErrorKind::DuplicateLabel {
                label: label.into(),
            }
            .into(),
        )
    }

    pub fn duplicate_row(row: impl Into<String>) -> Error {
        Error(ErrorKind::DuplicateRow { row: row.into() }.into())
    }

    pub fn label_type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Error {
        Error(
            ErrorKind::LabelTypeMismatch {
                expected: expected.into(),
                actual: actual.into(),
            }
            .into(),
        )
    }

    pub fn position_out_of_bounds(depth: usize, position: u64, len: usize) -> Error {
        Error(
            ErrorKind::PositionOutOfBounds {
                depth,
                position,
                len,
            }
            .into(),
        )
    }

    pub fn label_not_found(label: impl Into<String>) -> Error {
        Error(
            ErrorKind::LabelNotFound {
                label: label.into(),
            }
            .into(),
        )
    }

    /// Returns `true` if this error reports hierarchies of different depths.
    pub fn is_depth_mismatch(&self) -> bool {
        matches!(self.kind(), ErrorKind::DepthMismatch { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("all indices must have same depth (expected {expected}, found {actual})")]
    DepthMismatch { expected: usize, actual: usize },

    #[error("labels have non-unique values: {label}")]
    DuplicateLabel { label: String },

    #[error("hierarchical labels have non-unique rows: {row}")]
    DuplicateRow { row: String },

    #[error("label type mismatch: expected {expected}, found {actual}")]
    LabelTypeMismatch { expected: String, actual: String },

    #[error("position {position} at depth {depth} is out of bounds for a level of length {len}")]
    PositionOutOfBounds {
        depth: usize,
        position: u64,
        len: usize,
    },

    #[error("label {label} is not present in the target index")]
    LabelNotFound { label: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(_: std::convert::Infallible) -> Self {
        Error::invalid_operation("conversion")
    }
}
