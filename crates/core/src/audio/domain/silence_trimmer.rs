use super::audio_buffer::AudioBuffer;
use super::degenerate_silence::DegenerateSilence;
use super::energy_analyzer::{db_to_amplitude, EnergyAnalyzer};

#[derive(Clone, Debug, PartialEq)]
pub struct TrimResult {
    pub audio: AudioBuffer,
    /// Seconds removed from the start; the full input duration for a silent clip.
    pub leading_silence: f64,
    pub trailing_silence: f64,
    pub degenerate: Option<DegenerateSilence>,
}

impl TrimResult {
    pub fn is_silent(&self) -> bool {
        matches!(self.degenerate, Some(DegenerateSilence::SilentClip { .. }))
    }
}

/// Removes leading and trailing silence using a dBFS energy threshold.
///
/// Silence ends at the first analysis window louder than the threshold and
/// resumes after the last one. Whole windows are kept, so the cut never eats
/// into the onset of speech and trimming an already-trimmed clip is a no-op.
pub struct SilenceTrimmer {
    analyzer: EnergyAnalyzer,
}

impl SilenceTrimmer {
    pub fn new(analyzer: EnergyAnalyzer) -> Self {
        Self { analyzer }
    }

    pub fn trim_silence(&self, audio: AudioBuffer, threshold_db: f64) -> TrimResult {
        let threshold = db_to_amplitude(threshold_db);
        let total = audio.frame_count();
        let windows = self.analyzer.windowed_rms_frames(&audio, 0..total);

        let first_loud = windows.iter().find(|w| w.energy > threshold);
        let last_loud = windows.iter().rev().find(|w| w.energy > threshold);
        let (start, end) = match (first_loud, last_loud) {
            (Some(first), Some(last)) => (first.frames.start, last.frames.end),
            _ => {
                let duration = audio.duration();
                return TrimResult {
                    audio: audio.empty_like(),
                    leading_silence: duration,
                    trailing_silence: 0.0,
                    degenerate: Some(DegenerateSilence::SilentClip { duration }),
                };
            }
        };

        let leading_silence = audio.frames_to_seconds(start);
        let trailing_silence = audio.frames_to_seconds(total - end);
        if start == 0 && end == total {
            return TrimResult {
                audio,
                leading_silence,
                trailing_silence,
                degenerate: None,
            };
        }

        let (sample_rate, channels, format) = (audio.sample_rate(), audio.channels(), audio.format());
        let c = channels as usize;
        let mut samples = audio.into_samples();
        samples.truncate(end * c);
        samples.drain(..start * c);

        TrimResult {
            audio: AudioBuffer::new(samples, sample_rate, channels, format),
            leading_silence,
            trailing_silence,
            degenerate: None,
        }
    }
}

impl Default for SilenceTrimmer {
    fn default() -> Self {
        Self::new(EnergyAnalyzer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_buffer::SampleFormat;
    use crate::shared::constants::DEFAULT_TRIM_THRESHOLD_DB;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const RATE: u32 = 16000;

    fn padded_tone(lead: f64, tone: f64, tail: f64, amplitude: f64) -> AudioBuffer {
        let n = |secs: f64| (secs * RATE as f64).round() as usize;
        let mut samples = vec![0.0f32; n(lead)];
        samples.extend((0..n(tone)).map(|i| {
            let t = i as f64 / RATE as f64;
            (amplitude * (2.0 * std::f64::consts::PI * 300.0 * t + 0.3).sin()) as f32
        }));
        samples.extend(vec![0.0f32; n(tail)]);
        AudioBuffer::new(samples, RATE, 1, SampleFormat::Int16)
    }

    #[test]
    fn test_trims_leading_and_trailing_silence() {
        let audio = padded_tone(0.5, 1.0, 0.3, 0.8);
        let result = SilenceTrimmer::default().trim_silence(audio, DEFAULT_TRIM_THRESHOLD_DB);

        assert!(result.leading_silence <= 0.5);
        assert_abs_diff_eq!(result.leading_silence, 0.5, epsilon = 0.02);
        assert!(result.trailing_silence <= 0.3);
        assert_abs_diff_eq!(result.trailing_silence, 0.3, epsilon = 0.02);
        assert_abs_diff_eq!(result.audio.duration(), 1.0, epsilon = 0.04);
        assert!(result.degenerate.is_none());
    }

    #[test]
    fn test_removed_plus_kept_equals_original() {
        let audio = padded_tone(0.25, 0.5, 0.25, 0.8);
        let original = audio.frame_count();
        let result = SilenceTrimmer::default().trim_silence(audio, DEFAULT_TRIM_THRESHOLD_DB);
        let removed = ((result.leading_silence + result.trailing_silence) * RATE as f64).round();
        assert_eq!(result.audio.frame_count() + removed as usize, original);
    }

    #[test]
    fn test_trim_is_idempotent() {
        let trimmer = SilenceTrimmer::default();
        let once = trimmer.trim_silence(padded_tone(0.37, 0.8, 0.21, 0.8), DEFAULT_TRIM_THRESHOLD_DB);
        let frames = once.audio.frame_count();
        let twice = trimmer.trim_silence(once.audio, DEFAULT_TRIM_THRESHOLD_DB);

        assert_eq!(twice.leading_silence, 0.0);
        assert_eq!(twice.trailing_silence, 0.0);
        assert_eq!(twice.audio.frame_count(), frames);
    }

    #[test]
    fn test_all_silent_buffer_trims_to_nothing() {
        let audio = AudioBuffer::new(vec![0.0; RATE as usize], RATE, 1, SampleFormat::Int16);
        let result = SilenceTrimmer::default().trim_silence(audio, DEFAULT_TRIM_THRESHOLD_DB);

        assert!(result.audio.is_empty());
        assert_relative_eq!(result.leading_silence, 1.0);
        assert_eq!(result.trailing_silence, 0.0);
        assert!(result.is_silent());
        assert_eq!(result.audio.sample_rate(), RATE);
    }

    #[test]
    fn test_empty_buffer_is_silent_with_zero_leading() {
        let audio = AudioBuffer::new(Vec::new(), RATE, 2, SampleFormat::Int24);
        let result = SilenceTrimmer::default().trim_silence(audio, DEFAULT_TRIM_THRESHOLD_DB);
        assert!(result.is_silent());
        assert_eq!(result.leading_silence, 0.0);
        assert_eq!(result.audio.channels(), 2);
    }

    #[test]
    fn test_no_silence_returns_input_untouched() {
        let audio = padded_tone(0.0, 1.0, 0.0, 0.8);
        let expected = audio.clone();
        let result = SilenceTrimmer::default().trim_silence(audio, DEFAULT_TRIM_THRESHOLD_DB);
        assert_eq!(result.leading_silence, 0.0);
        assert_eq!(result.trailing_silence, 0.0);
        assert_eq!(result.audio, expected);
    }

    #[test]
    fn test_threshold_is_configurable() {
        // A 0.05-amplitude tone sits around -29 dBFS RMS.
        let trimmer = SilenceTrimmer::default();
        let quiet = padded_tone(0.1, 0.5, 0.1, 0.05);

        let lenient = trimmer.trim_silence(quiet.clone(), -40.0);
        assert!(!lenient.is_silent());

        let strict = trimmer.trim_silence(quiet, -20.0);
        assert!(strict.is_silent());
        assert_relative_eq!(strict.leading_silence, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_stereo_trim_keeps_whole_frames() {
        let mono = padded_tone(0.2, 0.5, 0.2, 0.8);
        let stereo: Vec<f32> = mono.samples().iter().flat_map(|s| [*s, *s * 0.5]).collect();
        let audio = AudioBuffer::new(stereo, RATE, 2, SampleFormat::Int16);
        let result = SilenceTrimmer::default().trim_silence(audio, DEFAULT_TRIM_THRESHOLD_DB);

        assert_eq!(result.audio.samples().len() % 2, 0);
        assert_abs_diff_eq!(result.leading_silence, 0.2, epsilon = 0.02);
        let first = result.audio.frames(0..1);
        assert_relative_eq!(first[1], first[0] * 0.5);
    }
}
