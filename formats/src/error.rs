use thiserror::Error;

/// Failure to interpret an asset buffer.
///
/// Loaders treat this as fatal for the one asset being read; whether that
/// aborts anything larger is the caller's decision.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("bad header: {0}")]
    BadHeader(String),
    #[error("buffer truncated while reading {0}")]
    Truncated(&'static str),
    #[error("offset {offset} for {what} is outside a {len} byte buffer")]
    OffsetOutOfBounds {
        what: &'static str,
        offset: usize,
        len: usize,
    },
    #[error("frame {frame} is corrupt: {reason}")]
    CorruptFrame { frame: usize, reason: String },
    #[error("frame {frame} uses unsupported compression {mode}")]
    UnsupportedCompression { frame: usize, mode: u8 },
    #[error("frame index {index} out of range ({count} frames)")]
    FrameOutOfRange { index: usize, count: usize },
}

impl FormatError {
    pub(crate) fn corrupt(frame: usize, reason: impl Into<String>) -> Self {
        FormatError::CorruptFrame {
            frame,
            reason: reason.into(),
        }
    }
}

/// Maps short reads from a `byteorder` cursor onto [`FormatError::Truncated`].
pub(crate) trait TruncatedExt<T> {
    fn or_truncated(self, what: &'static str) -> Result<T, FormatError>;
}

impl<T> TruncatedExt<T> for std::io::Result<T> {
    fn or_truncated(self, what: &'static str) -> Result<T, FormatError> {
        self.map_err(|_| FormatError::Truncated(what))
    }
}
