use super::codec::Mode;
use super::metadata::ECLevel;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum QRError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error(
        "Data too large: {len} {mode:?} units need {bits} bits, which no version from \
         {min_version} to {max_version} holds at level {ec_level}"
    )]
    DataTooLarge {
        mode: Mode,
        len: usize,
        bits: usize,
        ec_level: ECLevel,
        min_version: u8,
        max_version: u8,
    },

    #[error("Encoding overrun: {len} bits exceed capacity of {capacity} bits")]
    Encoding { len: usize, capacity: usize },

    #[error("Internal invariant violated: {0}")]
    Internal(&'static str),
}

/// Coarse error category, for callers that only need to pick a message.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    InvalidInput,
    DataTooLarge,
    Encoding,
    Internal,
}

impl QRError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::DataTooLarge { .. } => ErrorKind::DataTooLarge,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub type QRResult<T> = Result<T, QRError>;
