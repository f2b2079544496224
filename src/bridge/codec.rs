//! Line codec for bridge channels.
//!
//! Wraps [`tokio_util::codec::LinesCodec`] with a maximum line length so a
//! misbehaving backend (or client) emitting an unterminated stream cannot
//! grow a buffer without bound. A line is complete only once its `\n`
//! terminator has been seen.
//!
//! Used via [`tokio_util::codec::FramedRead`] on backend stdout, backend
//! stderr, and the client input half; the encoder side appends the `\n`
//! terminator for the server's reply writer.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::{AppError, Result};

/// Default maximum accepted line length: 1 MiB.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1_048_576;

/// Newline-delimited UTF-8 line codec with a length bound.
#[derive(Debug)]
pub struct LineCodec(LinesCodec);

impl LineCodec {
    /// Create a codec enforcing `max_line_bytes` per line.
    #[must_use]
    pub fn new(max_line_bytes: usize) -> Self {
        Self(LinesCodec::new_with_max_length(max_line_bytes))
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_BYTES)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = AppError;

    /// Decode the next complete line from `src`.
    ///
    /// Returns `Ok(None)` while no terminator has been seen yet, and
    /// `Err(AppError::Bridge("line too long…"))` when the accumulation
    /// buffer exceeds the configured bound.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.0.decode(src).map_err(map_codec_error)
    }

    /// Decode the final unterminated line when the stream reaches EOF.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.0.decode_eof(src).map_err(map_codec_error)
    }
}

impl Encoder<String> for LineCodec {
    type Error = AppError;

    /// Encode `item` as a `\n`-terminated line into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] on underlying I/O failures.
    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<()> {
        // The length bound is a decoder-side concern only.
        self.0.encode(item, dst).map_err(map_codec_error)
    }
}

/// Map a [`LinesCodecError`] to an [`AppError`].
fn map_codec_error(e: LinesCodecError) -> AppError {
    match e {
        LinesCodecError::MaxLineLengthExceeded => AppError::Bridge("line too long".into()),
        LinesCodecError::Io(io_err) => AppError::Io(io_err.to_string()),
    }
}
