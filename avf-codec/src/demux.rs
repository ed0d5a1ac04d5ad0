//! Frame demuxing
//!
//! Each 8704-byte frame chunk is split into one video byte matrix and one
//! reconstructed audio tap array.
//!
//! # Video layout
//!
//! The first 8192 bytes are 64 sub-blocks of 128 bytes. Sub-block `b`
//! contributes rows `3b`, `3b+1`, `3b+2` of a 192x40 matrix, taken from
//! three fixed 40-byte ranges within the sub-block: `[1, 41)`, `[45, 85)`
//! and `[88, 128)`. The interleaved rows alternate between chroma and luma
//! encodings; which parity carries chroma depends on the TV standard.
//!
//! # Audio layout
//!
//! The last 512 bytes are a sparse sample map. A 512-entry array is
//! pre-filled with the silence value and selectively overwritten by walking
//! the map with a cursor; the assignment order matters because indices can
//! be revisited. A map that runs out of bytes simply leaves silence behind -
//! truncation degrades to silence, never to garbage or a panic.

use crate::{
    AUDIO_BLOCK_SIZE, AvfError, AvfFile, FRAME_SIZE, MATRIX_PITCH, MATRIX_ROWS, SILENCE,
    VIDEO_BLOCK_SIZE, VideoStandard,
};

/// Bytes per video sub-block
const SUB_BLOCK_SIZE: usize = 128;

/// Video sub-blocks per frame
const SUB_BLOCK_COUNT: usize = 64;

/// Source byte ranges within a sub-block for its three matrix rows
const ROW_RANGES: [(usize, usize); 3] = [(1, 41), (45, 85), (88, 128)];

/// One demuxed video frame: an immutable 192x40 matrix of packed
/// chroma/luma bytes.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    bytes: Vec<u8>,
}

impl VideoFrame {
    /// One 40-byte packed row
    pub fn row(&self, row: usize) -> &[u8] {
        &self.bytes[row * MATRIX_PITCH..(row + 1) * MATRIX_PITCH]
    }

    /// The whole matrix, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One frame's reconstructed raw audio samples (unsigned, 0..=100)
#[derive(Debug, Clone)]
pub struct AudioTap {
    samples: Vec<u8>,
}

impl AudioTap {
    /// Raw tap values
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Number of taps (fixed per standard)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Extract the video byte matrix from a frame chunk.
///
/// Fails with a decode error on a chunk shorter than [`FRAME_SIZE`] rather
/// than reading out of bounds.
pub fn demux_video(chunk: &[u8]) -> Result<VideoFrame, AvfError> {
    if chunk.len() < FRAME_SIZE {
        return Err(AvfError::TruncatedFrame { len: chunk.len() });
    }

    let mut bytes = vec![0u8; MATRIX_ROWS * MATRIX_PITCH];
    for b in 0..SUB_BLOCK_COUNT {
        let block = &chunk[b * SUB_BLOCK_SIZE..(b + 1) * SUB_BLOCK_SIZE];
        for (field, &(start, end)) in ROW_RANGES.iter().enumerate() {
            let row = b * 3 + field;
            bytes[row * MATRIX_PITCH..(row + 1) * MATRIX_PITCH]
                .copy_from_slice(&block[start..end]);
        }
    }

    Ok(VideoFrame { bytes })
}

/// Extract the audio tap array from a frame chunk.
///
/// Fails with a decode error on a chunk shorter than [`FRAME_SIZE`].
pub fn demux_audio(chunk: &[u8], standard: VideoStandard) -> Result<AudioTap, AvfError> {
    if chunk.len() < FRAME_SIZE {
        return Err(AvfError::TruncatedFrame { len: chunk.len() });
    }
    Ok(decode_tap_block(
        &chunk[VIDEO_BLOCK_SIZE..FRAME_SIZE],
        standard,
    ))
}

/// Decode a (possibly short) audio block into a tap array.
///
/// The 512-entry scratch array starts at the silence value; every position
/// the map does not reach stays silent. The cursor walk mirrors the wire
/// layout exactly:
///
/// 1. 32 groups of 9 sample bytes scattered across standard-dependent
///    offsets, each followed by one skipped sync byte
/// 2. 19 single taps; the 50 Hz standard interleaves a second tap and skips
///    8 bytes, the 60 Hz standard skips 9
/// 3. one final byte for index 51, if any remains
pub fn decode_tap_block(block: &[u8], standard: VideoStandard) -> AudioTap {
    let (off1, off2) = standard.audio_offsets();
    let mut taps = [SILENCE; AUDIO_BLOCK_SIZE];
    let mut cursor = 0usize;

    for y in 0..32 {
        if cursor + 9 >= block.len() {
            break;
        }
        taps[y] = block[cursor];
        taps[y + off1] = block[cursor + 1];
        taps[y + 32 + off1] = block[cursor + 2];
        taps[y + 64 + off1] = block[cursor + 3];
        taps[y + 96 + off1] = block[cursor + 4];
        taps[y + 128 + off1] = block[cursor + 5];
        taps[y + 160 + off1] = block[cursor + 6];
        taps[y + off2] = block[cursor + 7];
        taps[y + 32 + off2] = block[cursor + 8];
        cursor += 10;
    }

    for y in 0..19 {
        if cursor >= block.len() {
            break;
        }
        taps[y + 32] = block[cursor];
        cursor += 1;
        match standard {
            VideoStandard::Pal => {
                if cursor < block.len() {
                    taps[y + 64 + off2] = block[cursor];
                    cursor += 1;
                }
                cursor += 8;
            }
            VideoStandard::Ntsc => cursor += 9,
        }
    }

    if cursor < block.len() {
        taps[51] = block[cursor];
    }

    AudioTap {
        samples: taps[..standard.audio_len()].to_vec(),
    }
}

/// Demux every complete frame chunk of a container.
///
/// Returns the video frames and audio taps in frame order; both vectors
/// have exactly [`AvfFile::frame_count`] entries.
pub fn demux_file(
    file: &AvfFile,
    standard: VideoStandard,
) -> Result<(Vec<VideoFrame>, Vec<AudioTap>), AvfError> {
    let mut video = Vec::with_capacity(file.frame_count());
    let mut audio = Vec::with_capacity(file.frame_count());
    for chunk in file.frames() {
        video.push(demux_video(chunk)?);
        audio.push(demux_audio(chunk, standard)?);
    }
    Ok((video, audio))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_with_video<F: Fn(usize) -> u8>(f: F) -> Vec<u8> {
        let mut chunk = vec![0u8; FRAME_SIZE];
        for (i, byte) in chunk[..VIDEO_BLOCK_SIZE].iter_mut().enumerate() {
            *byte = f(i);
        }
        chunk
    }

    #[test]
    fn test_video_row_mapping() {
        // Tag every byte with (position % 251) so each sub-block offset is
        // recoverable from the matrix.
        let chunk = chunk_with_video(|i| (i % 251) as u8);
        let frame = demux_video(&chunk).unwrap();

        for b in 0..SUB_BLOCK_COUNT {
            let base = b * SUB_BLOCK_SIZE;
            assert_eq!(frame.row(b * 3)[0], ((base + 1) % 251) as u8);
            assert_eq!(frame.row(b * 3 + 1)[0], ((base + 45) % 251) as u8);
            assert_eq!(frame.row(b * 3 + 2)[0], ((base + 88) % 251) as u8);
            assert_eq!(frame.row(b * 3 + 2)[39], ((base + 127) % 251) as u8);
        }
    }

    #[test]
    fn test_video_truncated_chunk_is_decode_error() {
        let chunk = vec![0u8; FRAME_SIZE - 1];
        assert!(matches!(
            demux_video(&chunk),
            Err(AvfError::TruncatedFrame { len }) if len == FRAME_SIZE - 1
        ));
        assert!(matches!(
            demux_audio(&chunk, VideoStandard::Pal),
            Err(AvfError::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_tap_length_is_fixed_per_standard() {
        let block = vec![0u8; AUDIO_BLOCK_SIZE];
        assert_eq!(decode_tap_block(&block, VideoStandard::Pal).len(), 312);
        assert_eq!(decode_tap_block(&block, VideoStandard::Ntsc).len(), 262);
    }

    #[test]
    fn test_empty_block_decodes_to_silence() {
        let tap = decode_tap_block(&[], VideoStandard::Pal);
        assert_eq!(tap.len(), 312);
        assert!(tap.samples().iter().all(|&s| s == SILENCE));
    }

    #[test]
    fn test_group_assignment_order() {
        // First 9-byte group: values 1..=9 at cursor 0..9, sync byte at 9.
        // The block stops there so later passes cannot revisit the indices
        // (a full block overwrites parts of the off1 region by design).
        let mut block = vec![0u8; 10];
        for (i, byte) in block.iter_mut().take(9).enumerate() {
            *byte = (i + 1) as u8;
        }
        let tap = decode_tap_block(&block, VideoStandard::Pal);
        let (off1, off2) = VideoStandard::Pal.audio_offsets();

        assert_eq!(tap.samples()[0], 1);
        assert_eq!(tap.samples()[off1], 2);
        assert_eq!(tap.samples()[32 + off1], 3);
        assert_eq!(tap.samples()[64 + off1], 4);
        assert_eq!(tap.samples()[96 + off1], 5);
        assert_eq!(tap.samples()[128 + off1], 6);
        assert_eq!(tap.samples()[160 + off1], 7);
        assert_eq!(tap.samples()[off2], 8);
        assert_eq!(tap.samples()[32 + off2], 9);
    }

    #[test]
    fn test_single_tap_run_and_final_byte() {
        // A full 512-byte block: the cursor lands on 320 after the scatter
        // groups, walks 19 single-tap strides of 10, and ends at 510 for the
        // final index-51 byte.
        let mut block = vec![0u8; AUDIO_BLOCK_SIZE];
        block[320] = 0x41; // first single tap -> index 32
        block[321] = 0x42; // PAL second tap -> index 64 + off2
        block[330] = 0x43; // second iteration -> index 33
        block[510] = 0x44; // final byte -> index 51

        let tap = decode_tap_block(&block, VideoStandard::Pal);
        let (_, off2) = VideoStandard::Pal.audio_offsets();
        assert_eq!(tap.samples()[32], 0x41);
        assert_eq!(tap.samples()[64 + off2], 0x42);
        assert_eq!(tap.samples()[33], 0x43);
        assert_eq!(tap.samples()[51], 0x44);
    }

    #[test]
    fn test_ntsc_skips_second_tap() {
        let mut block = vec![0u8; AUDIO_BLOCK_SIZE];
        block[320] = 0x41;
        block[321] = 0x42; // skipped on NTSC
        let tap = decode_tap_block(&block, VideoStandard::Ntsc);
        let (_, off2) = VideoStandard::Ntsc.audio_offsets();
        assert_eq!(tap.samples()[32], 0x41);
        assert_eq!(tap.samples()[64 + off2], SILENCE);
    }

    #[test]
    fn test_short_block_leaves_silence() {
        // Only one scatter group's worth of data; everything else silent.
        let block = vec![99u8; 10];
        let tap = decode_tap_block(&block, VideoStandard::Pal);
        let written: usize = tap.samples().iter().filter(|&&s| s == 99).count();
        assert_eq!(written, 9);
        // Single-tap loop and final byte never ran
        assert_eq!(tap.samples()[32], SILENCE);
        assert_eq!(tap.samples()[51], SILENCE);
    }

    #[test]
    fn test_demux_file_counts_match() {
        let file = AvfFile::from_bytes(vec![0u8; 2 * FRAME_SIZE]);
        let (video, audio) = demux_file(&file, VideoStandard::Pal).unwrap();
        assert_eq!(video.len(), 2);
        assert_eq!(audio.len(), 2);
        assert_eq!(video[0].as_bytes().len(), MATRIX_ROWS * MATRIX_PITCH);
    }
}
