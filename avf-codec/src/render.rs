//! Frame rendering
//!
//! Turns one demuxed video frame plus the current palette into the final
//! 192x160 RGB pixel buffer, applying the CRT-emulation post-process:
//!
//! 1. split matrix rows into chroma/luma fields by standard-dependent parity
//! 2. unpack two 4-bit values per byte (high nibble first)
//! 3. palette lookup -> 96x80 RGB
//! 4. horizontal x2 column repeat -> 96x160
//! 5. optional horizontal blend (analog bandwidth emulation)
//! 6. vertical x2 row repeat -> 192x160
//! 7. optional scanline darkening on odd output rows
//!
//! Toggles and tunables come in through [`PlaybackState`] each call; there
//! is no ambient render configuration.

use crate::{FRAME_HEIGHT, FRAME_WIDTH, MATRIX_PITCH, Palette, PlaybackState, VideoFrame,
            VideoStandard};

/// Darkening factor applied to odd output rows when scanlines are enabled
const SCANLINE_FACTOR: f32 = 0.6;

/// Render one frame to a row-major `192 x 160 x 3` RGB buffer.
pub fn render_frame(
    frame: &VideoFrame,
    palette: &Palette,
    standard: VideoStandard,
    state: &PlaybackState,
) -> Vec<u8> {
    let chroma_even = standard.chroma_rows_even();
    let mut out = vec![0u8; FRAME_HEIGHT * FRAME_WIDTH * 3];

    // One field row pair produces two identical (or scanline-darkened)
    // output rows, so the whole pipeline runs per half-row.
    let mut line = [[0u8; 3]; FRAME_WIDTH];
    for half in 0..FRAME_HEIGHT / 2 {
        let (chroma_row, luma_row) = if chroma_even {
            (frame.row(2 * half), frame.row(2 * half + 1))
        } else {
            (frame.row(2 * half + 1), frame.row(2 * half))
        };

        decode_line(chroma_row, luma_row, palette, &mut line);

        if state.blending {
            blend_line(&mut line);
        }

        for repeat in 0..2 {
            let y = 2 * half + repeat;
            let darken = state.scanlines && y % 2 == 1;
            let row = &mut out[y * FRAME_WIDTH * 3..(y + 1) * FRAME_WIDTH * 3];
            for (x, rgb) in line.iter().enumerate() {
                for (channel, &value) in rgb.iter().enumerate() {
                    row[x * 3 + channel] = if darken {
                        (value as f32 * SCANLINE_FACTOR) as u8
                    } else {
                        value
                    };
                }
            }
        }
    }

    out
}

/// Unpack one packed chroma/luma row pair and decode it through the palette
/// into a 160-pixel line (each nibble pair yields two identical columns).
fn decode_line(
    chroma_row: &[u8],
    luma_row: &[u8],
    palette: &Palette,
    line: &mut [[u8; 3]; FRAME_WIDTH],
) {
    for byte in 0..MATRIX_PITCH {
        let (c, l) = (chroma_row[byte], luma_row[byte]);
        for (nibble, (chroma, luma)) in [(c >> 4, l >> 4), (c & 0x0F, l & 0x0F)]
            .into_iter()
            .enumerate()
        {
            let rgb = palette.rgb((chroma << 4) | luma);
            let x = (byte * 2 + nibble) * 2;
            line[x] = rgb;
            line[x + 1] = rgb;
        }
    }
}

/// Horizontal blend: column 0 unchanged, column i becomes the per-channel
/// average of columns i and i-1. Walks right-to-left so each average reads
/// the unblended left neighbor.
fn blend_line(line: &mut [[u8; 3]; FRAME_WIDTH]) {
    for x in (1..FRAME_WIDTH).rev() {
        for channel in 0..3 {
            line[x][channel] =
                ((line[x][channel] as u16 + line[x - 1][channel] as u16) / 2) as u8;
        }
    }
}
