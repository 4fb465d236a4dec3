use thiserror::Error;

use crate::audio::domain::audio_codec::{DecodeError, EncodeError};
use crate::shared::segmentation_config::ConfigError;
use crate::shared::time_range::RangeError;

/// Any failure that aborts a segmentation request. No partial result is returned.
#[derive(Error, Debug)]
pub enum SegmentationError {
    #[error("failed to decode audio: {0}")]
    Decode(#[from] DecodeError),
    #[error("failed to encode audio: {0}")]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
