use crate::audio::domain::audio_codec::AudioCodec;
use crate::audio::domain::degenerate_silence::DegenerateSilence;
use crate::audio::domain::energy_analyzer::EnergyAnalyzer;
use crate::audio::domain::silence_point_finder::SilencePointFinder;
use crate::audio::domain::silence_trimmer::SilenceTrimmer;
use crate::audio::domain::splitter::Splitter;
use crate::audio::domain::word_timing::WordTiming;
use crate::audio::infrastructure::wav_codec::WavCodec;
use crate::pipeline::pipeline_logger::LogPipelineLogger;
use crate::pipeline::segment_dialog_use_case::{SegmentDialogUseCase, SegmentOutput, Turn};
use crate::pipeline::segmentation_error::SegmentationError;
use crate::shared::constants::DIALOG_TURN_COUNT;
use crate::shared::segmentation_config::{ConfigError, SegmentationConfig};
use crate::shared::time_range::{RangeError, TimeRange};

/// One encoded turn, ready to hand back to a caller that only speaks bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSegment {
    pub turn: Turn,
    pub audio_bytes: Vec<u8>,
    pub timings: Vec<WordTiming>,
    pub slice_start: f64,
    pub leading_trim: f64,
    pub trailing_trim: f64,
    /// Soft failures around this turn: its own trim and its adjacent boundaries.
    pub diagnostics: Vec<DegenerateSilence>,
}

/// Byte-in, byte-out entry points over the segmentation domain.
///
/// Every call decodes its input independently; a decode failure aborts the
/// call with no partial output.
pub struct DialogAudioService {
    codec: Box<dyn AudioCodec>,
    config: SegmentationConfig,
}

impl DialogAudioService {
    pub fn new(
        codec: Box<dyn AudioCodec>,
        config: SegmentationConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { codec, config })
    }

    fn analyzer(&self) -> EnergyAnalyzer {
        EnergyAnalyzer::new(self.config.energy_window())
    }

    /// Quietest instant in the absolute window `[search_start, search_end]`.
    ///
    /// The window is clamped to the clip; a window with no overlap at all is a
    /// `RangeError`. The returned time always lies inside the clip.
    pub fn find_best_split_point(
        &self,
        audio_bytes: &[u8],
        search_start: f64,
        search_end: f64,
    ) -> Result<f64, SegmentationError> {
        let audio = self.codec.decode(audio_bytes)?;
        let requested = TimeRange::new(search_start, search_end)?;
        let duration = audio.duration();
        if requested.end() < 0.0 || requested.start() > duration {
            return Err(RangeError::OutsideBuffer {
                time: requested.center(),
                duration,
            }
            .into());
        }
        let window = requested.clamp_to(duration);
        let rough_time = requested.center().clamp(window.start(), window.end());
        let point =
            SilencePointFinder::new(self.analyzer()).find_in_window(&audio, rough_time, window);
        if let Some(d) = &point.degenerate {
            log::warn!("{d}");
        }
        Ok(point.time)
    }

    /// Returns the trimmed clip and the seconds removed from its front.
    ///
    /// `threshold_db` defaults to the configured trim threshold.
    pub fn trim_silence(
        &self,
        audio_bytes: &[u8],
        threshold_db: Option<f64>,
    ) -> Result<(Vec<u8>, f64), SegmentationError> {
        let threshold_db = threshold_db.unwrap_or(self.config.trim_threshold_db);
        if !threshold_db.is_finite() || threshold_db > 0.0 {
            return Err(ConfigError::InvalidThreshold(threshold_db).into());
        }
        let audio = self.codec.decode(audio_bytes)?;
        let trim = SilenceTrimmer::new(self.analyzer()).trim_silence(audio, threshold_db);
        if let Some(d) = &trim.degenerate {
            log::warn!("{d}");
        }
        log::debug!(
            "Trimmed {:.3}s leading, {:.3}s trailing",
            trim.leading_silence,
            trim.trailing_silence
        );
        let bytes = self.codec.encode(&trim.audio)?;
        Ok((bytes, trim.leading_silence))
    }

    /// Cuts the clip at `split_point` seconds into two standalone files.
    pub fn split_wav_at_point(
        &self,
        audio_bytes: &[u8],
        split_point: f64,
    ) -> Result<(Vec<u8>, Vec<u8>), SegmentationError> {
        let audio = self.codec.decode(audio_bytes)?;
        let (head, tail) = Splitter::split_at(audio, split_point)?;
        Ok((self.codec.encode(&head)?, self.codec.encode(&tail)?))
    }

    /// Full three-turn segmentation of a synthesized dialog clip.
    pub fn segment_dialog(
        &self,
        audio_bytes: &[u8],
        rough_boundaries: (f64, f64),
        timings: &[WordTiming],
    ) -> Result<[EncodedSegment; DIALOG_TURN_COUNT], SegmentationError> {
        let audio = self.codec.decode(audio_bytes)?;
        let mut use_case =
            SegmentDialogUseCase::new(self.config.clone(), Box::new(LogPipelineLogger::new()))?;
        let result = use_case.execute(audio, rough_boundaries.into(), timings)?;

        let [setup_diag, response_diag, punchline_diag] =
            std::array::from_fn(|i| result.diagnostics_for(i));
        let [setup, response, punchline] = result.segments;
        Ok([
            self.encode_segment(setup, setup_diag)?,
            self.encode_segment(response, response_diag)?,
            self.encode_segment(punchline, punchline_diag)?,
        ])
    }

    fn encode_segment(
        &self,
        segment: SegmentOutput,
        diagnostics: Vec<DegenerateSilence>,
    ) -> Result<EncodedSegment, SegmentationError> {
        Ok(EncodedSegment {
            turn: segment.turn,
            audio_bytes: self.codec.encode(&segment.audio)?,
            timings: segment.timings,
            slice_start: segment.slice_start,
            leading_trim: segment.leading_trim,
            trailing_trim: segment.trailing_trim,
            diagnostics,
        })
    }
}

impl Default for DialogAudioService {
    fn default() -> Self {
        Self {
            codec: Box::new(WavCodec::new()),
            config: SegmentationConfig::default(),
        }
    }
}
