use std::ops::Range;

/// On-disk sample encoding, kept so clips are re-encoded at their source depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFormat {
    Int8,
    Int16,
    Int24,
    Float32,
}

impl SampleFormat {
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            SampleFormat::Int8 => 8,
            SampleFormat::Int16 => 16,
            SampleFormat::Int24 => 24,
            SampleFormat::Float32 => 32,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleFormat::Float32)
    }

    /// Magnitude of full scale for integer formats (`2^(bits - 1)`).
    pub fn full_scale(&self) -> f32 {
        match self {
            SampleFormat::Int8 => 128.0,
            SampleFormat::Int16 => 32_768.0,
            SampleFormat::Int24 => 8_388_608.0,
            SampleFormat::Float32 => 1.0,
        }
    }
}

/// Decoded audio: interleaved PCM samples normalized to [-1.0, 1.0].
///
/// A frame is one sample per channel. All offsets below are in frames, so a
/// split never lands between the channels of a single instant.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    format: SampleFormat,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16, format: SampleFormat) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
            format,
        }
    }

    /// A zero-length buffer sharing this buffer's rate, channels and format.
    pub fn empty_like(&self) -> Self {
        Self::new(Vec::new(), self.sample_rate, self.channels, self.format)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn frame_count(&self) -> usize {
        match self.channels {
            0 => 0,
            c => self.samples.len() / c as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    pub fn duration(&self) -> f64 {
        self.frames_to_seconds(self.frame_count())
    }

    pub fn frames_to_seconds(&self, frames: usize) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        frames as f64 / self.sample_rate as f64
    }

    /// Nearest frame index for `time`, rounding exact halves to the even index.
    ///
    /// Negative times map to frame 0; the result is not clamped to the buffer
    /// length so callers can detect out-of-range requests.
    pub fn frame_at_time(&self, time: f64) -> usize {
        let exact = time * self.sample_rate as f64;
        if exact <= 0.0 || !exact.is_finite() {
            return 0;
        }
        exact.round_ties_even() as usize
    }

    /// Interleaved samples of frames `[range.start, range.end)`, clamped to the buffer.
    pub fn frames(&self, range: Range<usize>) -> &[f32] {
        let c = self.channels as usize;
        let end = range.end.min(self.frame_count());
        let start = range.start.min(end);
        &self.samples[start * c..end * c]
    }

    /// Splits into `[0, frame)` and `[frame, len)`, moving the tail instead of copying.
    ///
    /// `frame` must not exceed `frame_count()`.
    pub(crate) fn split_off_frame(mut self, frame: usize) -> (Self, Self) {
        let tail = self.samples.split_off(frame * self.channels as usize);
        let tail = Self::new(tail, self.sample_rate, self.channels, self.format);
        (self, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn mono(len: usize, sample_rate: u32) -> AudioBuffer {
        AudioBuffer::new(vec![0.0; len], sample_rate, 1, SampleFormat::Int16)
    }

    #[test]
    fn test_new_creates_buffer_with_correct_fields() {
        let samples = vec![0.25f32; 16000];
        let buf = AudioBuffer::new(samples.clone(), 16000, 1, SampleFormat::Int24);
        assert_eq!(buf.samples(), &samples[..]);
        assert_eq!(buf.sample_rate(), 16000);
        assert_eq!(buf.channels(), 1);
        assert_eq!(buf.format(), SampleFormat::Int24);
    }

    #[test]
    fn test_duration_mono() {
        assert_eq!(mono(48000, 16000).duration(), 3.0);
    }

    #[test]
    fn test_duration_stereo_counts_frames() {
        let buf = AudioBuffer::new(vec![0.0; 96000], 48000, 2, SampleFormat::Int16);
        assert_eq!(buf.frame_count(), 48000);
        assert_eq!(buf.duration(), 1.0);
    }

    #[test]
    fn test_zero_channels_has_no_frames() {
        let buf = AudioBuffer::new(vec![0.0; 10], 16000, 0, SampleFormat::Int16);
        assert_eq!(buf.frame_count(), 0);
        assert!(buf.is_empty());
    }

    #[rstest]
    #[case::exact(0.5, 8000)]
    #[case::rounds_up(0.000_07, 1)]
    #[case::rounds_down(0.000_03, 0)]
    #[case::negative(-1.0, 0)]
    fn test_frame_at_time(#[case] time: f64, #[case] expected: usize) {
        assert_eq!(mono(16000, 16000).frame_at_time(time), expected);
    }

    #[rstest]
    #[case::half_to_even_down(2.5, 2)]
    #[case::half_to_even_up(3.5, 4)]
    fn test_frame_at_time_rounds_half_to_even(#[case] time: f64, #[case] expected: usize) {
        // 1 Hz makes time == exact frame position.
        assert_eq!(mono(10, 1).frame_at_time(time), expected);
    }

    #[test]
    fn test_frame_at_time_is_not_clamped() {
        assert_eq!(mono(100, 100).frame_at_time(2.0), 200);
    }

    #[test]
    fn test_frames_returns_interleaved_channels() {
        let buf = AudioBuffer::new(
            vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3],
            10,
            2,
            SampleFormat::Float32,
        );
        assert_eq!(buf.frames(1..3), &[0.2f32, -0.2, 0.3, -0.3]);
    }

    #[test]
    fn test_frames_clamps_past_end() {
        let buf = mono(10, 10);
        assert_eq!(buf.frames(8..20).len(), 2);
        assert!(buf.frames(20..30).is_empty());
    }

    #[test]
    fn test_split_off_frame_conserves_samples() {
        let samples: Vec<f32> = (0..20).map(|i| i as f32 / 20.0).collect();
        let buf = AudioBuffer::new(samples.clone(), 10, 2, SampleFormat::Int16);
        let (head, tail) = buf.split_off_frame(4);
        assert_eq!(head.frame_count(), 4);
        assert_eq!(tail.frame_count(), 6);
        assert_eq!(head.samples(), &samples[..8]);
        assert_eq!(tail.samples(), &samples[8..]);
    }

    #[test]
    fn test_empty_like() {
        let buf = AudioBuffer::new(vec![0.5; 100], 22050, 2, SampleFormat::Int24);
        let empty = buf.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.sample_rate(), 22050);
        assert_eq!(empty.channels(), 2);
        assert_eq!(empty.format(), SampleFormat::Int24);
    }

    #[test]
    fn test_full_scale() {
        assert_eq!(SampleFormat::Int16.full_scale(), 32768.0);
        assert_eq!(SampleFormat::Int24.bits_per_sample(), 24);
        assert!(SampleFormat::Float32.is_float());
    }
}
