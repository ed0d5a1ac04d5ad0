//! AVF container reading
//!
//! An AVF file is a flat sequence of fixed-size frame chunks, optionally
//! preceded by a fixed-size header. There is no magic and no index: the only
//! structural signal is the file size itself.

use std::path::Path;

use crate::{AvfError, FRAME_SIZE, HEADER_SIZE};

/// Header-skip heuristic.
///
/// A file whose size is an exact multiple of the frame size is pure frame
/// data; anything else is assumed to carry a leading [`HEADER_SIZE`]-byte
/// header. The heuristic is not validated further - a malformed file that
/// happens to pass it yields garbage frames, not an error.
pub fn has_leading_header(file_size: usize) -> bool {
    file_size % FRAME_SIZE != 0
}

/// An opened AVF container, sliced into fixed-size frame chunks.
///
/// A trailing chunk shorter than [`FRAME_SIZE`] is dropped at load so that
/// every chunk handed to the demuxer is complete.
#[derive(Debug, Clone)]
pub struct AvfFile {
    data: Vec<u8>,
    /// Byte offset where frame data starts (0 or HEADER_SIZE)
    payload_start: usize,
}

impl AvfFile {
    /// Read an AVF container from disk.
    ///
    /// Fails only if the file cannot be read; content is never validated.
    pub fn open(path: &Path) -> Result<Self, AvfError> {
        let data = std::fs::read(path)?;
        Ok(Self::from_bytes(data))
    }

    /// Wrap an in-memory AVF container.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let payload_start = if has_leading_header(data.len()) {
            HEADER_SIZE.min(data.len())
        } else {
            0
        };

        let file = Self {
            data,
            payload_start,
        };
        tracing::debug!(
            "AVF container: {} bytes, header skipped: {}, {} frames",
            file.data.len(),
            file.skipped_header(),
            file.frame_count()
        );
        file
    }

    /// Whether the leading header was skipped
    pub fn skipped_header(&self) -> bool {
        self.payload_start != 0
    }

    fn payload(&self) -> &[u8] {
        &self.data[self.payload_start..]
    }

    /// Number of complete frame chunks
    pub fn frame_count(&self) -> usize {
        self.payload().len() / FRAME_SIZE
    }

    /// Iterate over complete frame chunks in order
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> {
        self.payload().chunks_exact(FRAME_SIZE)
    }

    /// Get a single frame chunk
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(FRAME_SIZE)?;
        self.payload().get(start..start + FRAME_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_heuristic() {
        assert!(!has_leading_header(0));
        assert!(!has_leading_header(FRAME_SIZE));
        assert!(!has_leading_header(2 * FRAME_SIZE));
        assert!(has_leading_header(FRAME_SIZE + 1));
        assert!(has_leading_header(HEADER_SIZE));
        assert!(has_leading_header(HEADER_SIZE + 3 * FRAME_SIZE));
    }

    #[test]
    fn test_exact_multiple_has_no_header() {
        let file = AvfFile::from_bytes(vec![0xAB; 2 * FRAME_SIZE]);
        assert!(!file.skipped_header());
        assert_eq!(file.frame_count(), 2);
        assert_eq!(file.frames().count(), 2);
        // First payload byte is the first file byte
        assert_eq!(file.frame(0).unwrap()[0], 0xAB);
    }

    #[test]
    fn test_header_skipped_when_size_not_multiple() {
        let mut data = vec![0xFFu8; HEADER_SIZE];
        data.extend(std::iter::repeat_n(0x11u8, FRAME_SIZE));
        let file = AvfFile::from_bytes(data);
        assert!(file.skipped_header());
        assert_eq!(file.frame_count(), 1);
        assert_eq!(file.frame(0).unwrap()[0], 0x11);
    }

    #[test]
    fn test_trailing_partial_chunk_dropped() {
        // Header + 1 full frame + 612 stray bytes
        let data = vec![0u8; HEADER_SIZE + FRAME_SIZE + 612];
        let file = AvfFile::from_bytes(data);
        assert!(file.skipped_header());
        assert_eq!(file.frame_count(), 1);
        assert!(file.frame(1).is_none());
    }

    #[test]
    fn test_file_smaller_than_header() {
        let file = AvfFile::from_bytes(vec![0u8; 100]);
        assert!(file.skipped_header());
        assert_eq!(file.frame_count(), 0);
        assert_eq!(file.frames().count(), 0);
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AvfFile::open(&dir.path().join("missing.avf"));
        assert!(matches!(result, Err(AvfError::Io(_))));
    }

    #[test]
    fn test_open_reads_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.avf");
        std::fs::write(&path, vec![7u8; FRAME_SIZE]).unwrap();

        let file = AvfFile::open(&path).unwrap();
        assert_eq!(file.frame_count(), 1);
        assert!(!file.skipped_header());
    }
}
