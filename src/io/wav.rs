/*
RIFF/WAVE PCM16 Encoder
=======================

The file is a 44-byte header followed by interleaved 16-bit samples, all
little-endian:

  offset  size  field
  ------  ----  ---------------------------------------------
     0      4   "RIFF"
     4      4   file size - 8
     8      4   "WAVE"
    12      4   "fmt "
    16      4   16 (fmt chunk size)
    20      2   1 (PCM)
    22      2   channels
    24      4   sample rate
    28      4   byte rate    = sample rate * channels * 2
    32      2   block align  = channels * 2
    34      2   16 (bits per sample)
    36      4   "data"
    40      4   data size    = frames * channels * 2
    44      ..  frame 0 ch 0, frame 0 ch 1, frame 1 ch 0, ...

Float to int16 conversion is asymmetric so that both rails are reachable:
negative samples scale by 32768 and positive ones by 32767, after clamping to
[-1, 1]. The product is truncated toward zero, not rounded.
*/

use std::io::{self, Write};

use tracing::warn;

use super::AudioBuffer;

pub const HEADER_LEN: usize = 44;
const BYTES_PER_SAMPLE: u16 = 2;
const BITS_PER_SAMPLE: u16 = 16;
const PCM_FORMAT: u16 = 1;

/// Convert one float sample to a PCM16 value.
#[inline]
pub fn sample_to_pcm16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32_768.0) as i16
    } else {
        (clamped * 32_767.0) as i16
    }
}

fn data_len(buffer: &AudioBuffer) -> u64 {
    buffer.frames() as u64 * buffer.num_channels() as u64 * BYTES_PER_SAMPLE as u64
}

/// Write `buffer` as a complete WAV file.
pub fn write_wav<W: Write>(writer: &mut W, buffer: &AudioBuffer) -> io::Result<()> {
    let too_large = || io::Error::new(io::ErrorKind::InvalidInput, "audio too large for a WAV file");
    let channels = u16::try_from(buffer.num_channels()).map_err(|_| too_large())?;
    let sample_rate = buffer.sample_rate();
    let block_align = channels.checked_mul(BYTES_PER_SAMPLE).ok_or_else(too_large)?;
    let byte_rate = sample_rate.saturating_mul(block_align as u32);
    let data_size = u32::try_from(data_len(buffer)).map_err(|_| too_large())?;
    let riff_size = data_size
        .checked_add(HEADER_LEN as u32 - 8)
        .ok_or_else(too_large)?;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&riff_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&PCM_FORMAT.to_le_bytes())?;
    writer.write_all(&channels.to_le_bytes())?;
    writer.write_all(&sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;

    let mut frame = Vec::with_capacity(block_align as usize);
    for i in 0..buffer.frames() {
        frame.clear();
        for channel in buffer.channels() {
            frame.extend_from_slice(&sample_to_pcm16(channel[i]).to_le_bytes());
        }
        writer.write_all(&frame)?;
    }

    Ok(())
}

/// Encode `buffer` as WAV bytes.
///
/// Buffers too large for the 32-bit RIFF size fields are truncated to the
/// frames that fit. Fails only when the channel count does not fit the
/// header.
pub fn encode_wav(buffer: &AudioBuffer) -> io::Result<Vec<u8>> {
    let max_frames = riff_frame_limit(buffer.num_channels());
    let fitted;
    let buffer = if buffer.frames() > max_frames {
        warn!(
            frames = buffer.frames(),
            kept = max_frames,
            "audio exceeds the RIFF size limit, truncating"
        );
        let frames = max_frames;
        let channels = buffer
            .channels()
            .iter()
            .map(|c| c[..frames].to_vec())
            .collect();
        fitted = AudioBuffer::from_channels(buffer.sample_rate(), channels);
        &fitted
    } else {
        buffer
    };

    let mut bytes = Vec::with_capacity(HEADER_LEN + data_len(buffer) as usize);
    write_wav(&mut bytes, buffer)?;
    Ok(bytes)
}

/// Most frames whose data chunk still fits the 32-bit RIFF size fields.
pub fn riff_frame_limit(num_channels: usize) -> usize {
    let max_data = (u32::MAX - (HEADER_LEN as u32 - 8)) as u64;
    let frame_bytes = (num_channels as u64 * BYTES_PER_SAMPLE as u64).max(1);
    usize::try_from(max_data / frame_bytes).unwrap_or(usize::MAX)
}
