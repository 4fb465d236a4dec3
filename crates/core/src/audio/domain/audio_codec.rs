use thiserror::Error;

use super::audio_buffer::AudioBuffer;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("data chunk declares {declared} bytes but only {available} are present")]
    Truncated { declared: u64, available: u64 },
    #[error("unsupported sample format: {bits}-bit {kind}")]
    UnsupportedFormat { bits: u16, kind: &'static str },
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("malformed audio data: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("cannot encode buffer: {0}")]
    InvalidBuffer(String),
    #[error("audio writer failed: {0}")]
    Writer(String),
}

/// Domain interface for turning container bytes into samples and back.
///
/// Implementations operate on in-memory buffers only.
pub trait AudioCodec: Send {
    fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer, DecodeError>;

    /// Encode at the buffer's own sample rate, channel count and sample format.
    fn encode(&self, audio: &AudioBuffer) -> Result<Vec<u8>, EncodeError>;
}
