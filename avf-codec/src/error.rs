//! AVF decode error types

use thiserror::Error;

/// Errors that can occur while reading or demuxing an AVF container
#[derive(Debug, Error)]
pub enum AvfError {
    /// The file could not be opened or read
    #[error("failed to read AVF file")]
    Io(#[from] std::io::Error),

    /// A frame chunk is shorter than the fixed frame size and cannot be
    /// sliced into its video sub-blocks
    #[error("truncated frame chunk: {len} bytes, need {}", crate::FRAME_SIZE)]
    TruncatedFrame {
        /// Actual chunk length in bytes
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_frame_message() {
        let err = AvfError::TruncatedFrame { len: 100 };
        assert_eq!(
            err.to_string(),
            "truncated frame chunk: 100 bytes, need 8704"
        );
    }
}
