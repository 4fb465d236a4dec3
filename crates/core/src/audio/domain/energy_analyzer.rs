use std::ops::Range;

use super::audio_buffer::AudioBuffer;
use crate::shared::segmentation_config::EnergyWindowConfig;
use crate::shared::time_range::TimeRange;

/// RMS energy of one analysis window.
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyWindow {
    /// Frame span `[start, end)` in the analysed buffer.
    pub frames: Range<usize>,
    pub start_time: f64,
    pub end_time: f64,
    pub energy: f64,
}

impl EnergyWindow {
    /// Centre of the (possibly clipped) window.
    pub fn timestamp(&self) -> f64 {
        (self.start_time + self.end_time) / 2.0
    }
}

/// Computes windowed RMS energy over a time range of an [`AudioBuffer`].
///
/// Channels are merged by averaging power: every interleaved sample in the
/// window contributes its square, and the square root is taken once.
#[derive(Clone, Copy, Debug)]
pub struct EnergyAnalyzer {
    config: EnergyWindowConfig,
}

impl EnergyAnalyzer {
    pub fn new(config: EnergyWindowConfig) -> Self {
        Self { config }
    }

    pub fn window_frames(&self, sample_rate: u32) -> usize {
        ms_to_frames(self.config.window_ms, sample_rate)
    }

    pub fn hop_frames(&self, sample_rate: u32) -> usize {
        ms_to_frames(self.config.hop_ms, sample_rate)
    }

    /// Energy of consecutive windows covering `range`.
    ///
    /// Windows start at the range start and advance by the hop. The last
    /// window is clipped to the range end instead of being dropped, and no
    /// window starts after one has already reached the end.
    pub fn windowed_rms(&self, audio: &AudioBuffer, range: TimeRange) -> Vec<EnergyWindow> {
        let start = audio.frame_at_time(range.start());
        let end = audio.frame_at_time(range.end());
        self.windowed_rms_frames(audio, start..end)
    }

    /// Same as [`windowed_rms`](Self::windowed_rms) over a frame span, clamped to the buffer.
    pub fn windowed_rms_frames(&self, audio: &AudioBuffer, range: Range<usize>) -> Vec<EnergyWindow> {
        let total = audio.frame_count();
        let start = range.start.min(total);
        let end = range.end.min(total);
        if start >= end {
            return Vec::new();
        }

        let window = self.window_frames(audio.sample_rate());
        let hop = self.hop_frames(audio.sample_rate());
        let mut windows = Vec::with_capacity((end - start) / hop + 1);

        let mut pos = start;
        loop {
            let win_end = (pos + window).min(end);
            windows.push(EnergyWindow {
                frames: pos..win_end,
                start_time: audio.frames_to_seconds(pos),
                end_time: audio.frames_to_seconds(win_end),
                energy: rms(audio.frames(pos..win_end)),
            });
            if win_end >= end {
                break;
            }
            pos += hop;
        }
        windows
    }
}

impl Default for EnergyAnalyzer {
    fn default() -> Self {
        Self::new(EnergyWindowConfig::default())
    }
}

fn ms_to_frames(ms: f64, sample_rate: u32) -> usize {
    let frames = (ms * sample_rate as f64 / 1000.0).round();
    if frames.is_finite() && frames >= 1.0 {
        frames as usize
    } else {
        1
    }
}

/// Root-mean-square of `samples`; 0 for an empty slice.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|s| (*s as f64) * (*s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// dBFS to linear amplitude: `10^(db / 20)`.
pub fn db_to_amplitude(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Linear amplitude to dBFS; silence is negative infinity.
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        20.0 * amplitude.log10()
    } else {
        f64::NEG_INFINITY
    }
}
