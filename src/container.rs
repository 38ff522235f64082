use crate::{BitWriter, EncodeError};
use log::debug;
use std::io::Write;

const RIFF_MAGIC: &[u8; 4] = b"RIFF";
const WEBP_MAGIC: &[u8; 4] = b"WEBP";
const VP8_MAGIC: &[u8; 4] = b"VP8 ";
const VP8L_MAGIC: &[u8; 4] = b"VP8L";

/// First byte of every lossless bitstream
const VP8L_SIGNATURE: u8 = 0x2f;

/// Size of the "WEBP" form type
const TAG_SIZE: usize = 4;
/// Fourcc and size of a chunk
const CHUNK_HEADER_SIZE: usize = 8;

/// Largest header: RIFF header, form type, chunk header and the lossless signature
const MAX_HEADER_SIZE: usize = 8 + TAG_SIZE + CHUNK_HEADER_SIZE + 1;

/// Finish `writer` and write it as a single chunk RIFF/WebP file into `sink`.
///
/// ```text
/// "RIFF" | riff size u32le | "WEBP" | "VP8 "/"VP8L" | chunk size u32le | [0x2f] | payload | [0x00]
/// ```
///
/// For lossless streams the chunk size includes the signature byte. Chunks must have an even
/// size, odd payloads are followed by a zero byte that is counted in the RIFF size but not in the
/// chunk size.
///
/// Returns the number of bytes written. Errors of `sink` are returned as they are, the sink's
/// content is undefined in that case.
pub fn write_framed_stream<W: Write>(
    writer: &mut BitWriter,
    mut sink: W,
) -> Result<usize, EncodeError> {
    writer.finish()?;

    let lossless = writer.is_lossless();

    let payload_size = writer.len() + usize::from(lossless);
    let pad = payload_size & 1;
    let riff_size = TAG_SIZE + CHUNK_HEADER_SIZE + payload_size + pad;

    let riff_size_field =
        u32::try_from(riff_size).map_err(|_| EncodeError::PayloadTooLarge(payload_size))?;
    let payload_size_field = payload_size as u32;

    let mut header = [0u8; MAX_HEADER_SIZE];
    header[0..4].copy_from_slice(RIFF_MAGIC);
    header[4..8].copy_from_slice(&riff_size_field.to_le_bytes());
    header[8..12].copy_from_slice(WEBP_MAGIC);
    header[12..16].copy_from_slice(if lossless { VP8L_MAGIC } else { VP8_MAGIC });
    header[16..20].copy_from_slice(&payload_size_field.to_le_bytes());

    let header_len = if lossless {
        header[20] = VP8L_SIGNATURE;
        MAX_HEADER_SIZE
    } else {
        MAX_HEADER_SIZE - 1
    };

    debug!(
        "framing {} stream: payload {payload_size} bytes, riff size {riff_size}, pad {pad}",
        if lossless { "VP8L" } else { "VP8" }
    );

    sink.write_all(&header[..header_len])?;
    sink.write_all(writer.as_bytes())?;

    if pad == 1 {
        sink.write_all(&[0])?;
    }

    sink.flush()?;

    Ok(header_len + writer.len() + pad)
}
