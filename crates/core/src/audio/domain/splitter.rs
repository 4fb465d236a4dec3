use super::audio_buffer::AudioBuffer;
use crate::shared::time_range::RangeError;

/// Cuts a buffer into two independently valid buffers.
///
/// Split times are rounded to the nearest frame, exact halves to the even
/// frame, so `head.frame_count() + tail.frame_count()` always equals the input.
pub struct Splitter;

impl Splitter {
    pub fn split_at(
        audio: AudioBuffer,
        split_point: f64,
    ) -> Result<(AudioBuffer, AudioBuffer), RangeError> {
        let frame = Self::frame_for(&audio, split_point)?;
        Self::split_at_frame(audio, frame)
    }

    /// Frame index a split at `time` would cut at.
    pub fn frame_for(audio: &AudioBuffer, time: f64) -> Result<usize, RangeError> {
        let duration = audio.duration();
        if !time.is_finite() || time < 0.0 || time > duration {
            return Err(RangeError::OutsideBuffer { time, duration });
        }
        Ok(audio.frame_at_time(time).min(audio.frame_count()))
    }

    pub fn split_at_frame(
        audio: AudioBuffer,
        frame: usize,
    ) -> Result<(AudioBuffer, AudioBuffer), RangeError> {
        let frames = audio.frame_count();
        if frame > frames {
            return Err(RangeError::FrameOutsideBuffer { frame, frames });
        }
        Ok(audio.split_off_frame(frame))
    }
}
