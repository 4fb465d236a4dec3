use std::io::{Cursor, ErrorKind};

use crate::audio::domain::audio_buffer::{AudioBuffer, SampleFormat};
use crate::audio::domain::audio_codec::{AudioCodec, DecodeError, EncodeError};

/// RIFF/WAVE PCM codec backed by `hound`.
///
/// Decodes 8/16/24-bit integer and 32-bit float PCM. 32-bit integer PCM is
/// rejected because its samples do not survive a trip through `f32`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WavCodec;

impl WavCodec {
    pub fn new() -> Self {
        Self
    }
}

impl AudioCodec for WavCodec {
    fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer, DecodeError> {
        let reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let format = sample_format_of(&spec)?;
        if spec.channels == 0 {
            return Err(DecodeError::InvalidHeader("zero channels".into()));
        }
        if spec.sample_rate == 0 {
            return Err(DecodeError::InvalidHeader("zero sample rate".into()));
        }

        let declared_samples = reader.len() as u64;
        let declared = declared_samples * (spec.bits_per_sample as u64).div_ceil(8);
        let data_start = reader.into_inner().position();
        let available = (bytes.len() as u64).saturating_sub(data_start);
        if declared > available {
            return Err(DecodeError::Truncated {
                declared,
                available,
            });
        }
        if declared_samples % spec.channels as u64 != 0 {
            return Err(DecodeError::Malformed(format!(
                "{declared_samples} samples do not divide into {} channels",
                spec.channels
            )));
        }

        let truncated = |e: hound::Error| match e {
            hound::Error::IoError(ref io) if io.kind() == ErrorKind::UnexpectedEof => {
                DecodeError::Truncated {
                    declared,
                    available,
                }
            }
            other => DecodeError::from(other),
        };

        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let samples = match format {
            SampleFormat::Float32 => reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(truncated)?,
            int => {
                let scale = int.full_scale();
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(truncated)?
            }
        };

        log::debug!(
            "Decoded WAV: {} Hz, {} ch, {}-bit, {} samples",
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            samples.len()
        );
        Ok(AudioBuffer::new(
            samples,
            spec.sample_rate,
            spec.channels,
            format,
        ))
    }

    fn encode(&self, audio: &AudioBuffer) -> Result<Vec<u8>, EncodeError> {
        if audio.channels() == 0 || audio.sample_rate() == 0 {
            return Err(EncodeError::InvalidBuffer(format!(
                "{} channels at {} Hz",
                audio.channels(),
                audio.sample_rate()
            )));
        }
        if audio.samples().len() % audio.channels() as usize != 0 {
            return Err(EncodeError::InvalidBuffer(format!(
                "{} samples do not divide into {} channels",
                audio.samples().len(),
                audio.channels()
            )));
        }

        let format = audio.format();
        let spec = hound::WavSpec {
            channels: audio.channels(),
            sample_rate: audio.sample_rate(),
            bits_per_sample: format.bits_per_sample(),
            sample_format: if format.is_float() {
                hound::SampleFormat::Float
            } else {
                hound::SampleFormat::Int
            },
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
            if format.is_float() {
                for &s in audio.samples() {
                    writer.write_sample(s)?;
                }
            } else {
                let scale = format.full_scale();
                for &s in audio.samples() {
                    let v = (s * scale).round().clamp(-scale, scale - 1.0);
                    writer.write_sample(v as i32)?;
                }
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}

fn sample_format_of(spec: &hound::WavSpec) -> Result<SampleFormat, DecodeError> {
    match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 8) => Ok(SampleFormat::Int8),
        (hound::SampleFormat::Int, 16) => Ok(SampleFormat::Int16),
        (hound::SampleFormat::Int, 24) => Ok(SampleFormat::Int24),
        (hound::SampleFormat::Float, 32) => Ok(SampleFormat::Float32),
        (hound::SampleFormat::Int, bits) => Err(DecodeError::UnsupportedFormat {
            bits,
            kind: "integer",
        }),
        (hound::SampleFormat::Float, bits) => Err(DecodeError::UnsupportedFormat {
            bits,
            kind: "float",
        }),
    }
}

impl From<hound::Error> for DecodeError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::FormatError(msg) => DecodeError::InvalidHeader(msg.to_string()),
            hound::Error::IoError(ref io) if io.kind() == ErrorKind::UnexpectedEof => {
                DecodeError::InvalidHeader("unexpected end of header".into())
            }
            other => DecodeError::Malformed(other.to_string()),
        }
    }
}

impl From<hound::Error> for EncodeError {
    fn from(e: hound::Error) -> Self {
        EncodeError::Writer(e.to_string())
    }
}
