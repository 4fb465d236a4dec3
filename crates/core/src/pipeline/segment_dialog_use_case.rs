use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::audio::domain::degenerate_silence::DegenerateSilence;
use crate::audio::domain::energy_analyzer::EnergyAnalyzer;
use crate::audio::domain::silence_point_finder::{SilencePointFinder, SplitPoint};
use crate::audio::domain::silence_trimmer::SilenceTrimmer;
use crate::audio::domain::splitter::Splitter;
use crate::audio::domain::timing_adjuster::TimingAdjuster;
use crate::audio::domain::word_timing::WordTiming;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::segmentation_error::SegmentationError;
use crate::shared::constants::DIALOG_TURN_COUNT;
use crate::shared::segmentation_config::{ConfigError, SegmentationConfig};
use crate::shared::time_range::RangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Setup,
    Response,
    Punchline,
}

impl Turn {
    pub const ALL: [Turn; DIALOG_TURN_COUNT] = [Turn::Setup, Turn::Response, Turn::Punchline];
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::Setup => write!(f, "Setup"),
            Turn::Response => write!(f, "Response"),
            Turn::Punchline => write!(f, "Punchline"),
        }
    }
}

/// The provider's rough turn boundaries, in the full clip's time base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSegmentBoundaries {
    pub setup_end: f64,
    pub response_end: f64,
}

impl From<(f64, f64)> for VoiceSegmentBoundaries {
    fn from((setup_end, response_end): (f64, f64)) -> Self {
        Self {
            setup_end,
            response_end,
        }
    }
}

/// One delivered turn. `timings` are relative to the first sample of `audio`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutput {
    pub turn: Turn,
    pub audio: AudioBuffer,
    pub timings: Vec<WordTiming>,
    /// Where the untrimmed segment began in the original clip.
    pub slice_start: f64,
    pub leading_trim: f64,
    pub trailing_trim: f64,
    /// Set when trimming found no audible speech in this turn.
    pub degenerate: Option<DegenerateSilence>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogSegmentation {
    pub segments: [SegmentOutput; DIALOG_TURN_COUNT],
    pub split_points: [SplitPoint; DIALOG_TURN_COUNT - 1],
    pub diagnostics: Vec<DegenerateSilence>,
}

impl DialogSegmentation {
    /// Diagnostics that concern turn `index`: the boundaries on either side of
    /// it and its own trim.
    pub fn diagnostics_for(&self, index: usize) -> Vec<DegenerateSilence> {
        let before = index.checked_sub(1).and_then(|i| self.split_points.get(i));
        let after = self.split_points.get(index);
        before
            .into_iter()
            .chain(after)
            .filter_map(|p| p.degenerate.clone())
            .chain(self.segments.get(index).and_then(|s| s.degenerate.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationStage {
    Init,
    BoundariesRefined,
    Split,
    Trimmed,
    TimingsAdjusted,
    Done,
}

impl SegmentationStage {
    pub fn next(self) -> Self {
        match self {
            SegmentationStage::Init => SegmentationStage::BoundariesRefined,
            SegmentationStage::BoundariesRefined => SegmentationStage::Split,
            SegmentationStage::Split => SegmentationStage::Trimmed,
            SegmentationStage::Trimmed => SegmentationStage::TimingsAdjusted,
            SegmentationStage::TimingsAdjusted | SegmentationStage::Done => SegmentationStage::Done,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentationStage::Init => "init",
            SegmentationStage::BoundariesRefined => "boundaries_refined",
            SegmentationStage::Split => "split",
            SegmentationStage::Trimmed => "trimmed",
            SegmentationStage::TimingsAdjusted => "timings_adjusted",
            SegmentationStage::Done => "done",
        }
    }
}

struct StageClock {
    stage: SegmentationStage,
    started: Instant,
}

impl StageClock {
    fn new() -> Self {
        Self {
            stage: SegmentationStage::Init,
            started: Instant::now(),
        }
    }

    fn advance(&mut self, logger: &mut dyn PipelineLogger) {
        let next = self.stage.next();
        logger.timing(next.as_str(), self.started.elapsed().as_secs_f64() * 1000.0);
        log::debug!("{} -> {}", self.stage.as_str(), next.as_str());
        self.stage = next;
        self.started = Instant::now();
    }
}

/// Three-way dialog split: refine boundaries → split → trim → re-base timings.
pub struct SegmentDialogUseCase {
    finder: SilencePointFinder,
    trimmer: SilenceTrimmer,
    config: SegmentationConfig,
    logger: Box<dyn PipelineLogger>,
}

impl SegmentDialogUseCase {
    pub fn new(
        config: SegmentationConfig,
        logger: Box<dyn PipelineLogger>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let analyzer = EnergyAnalyzer::new(config.energy_window());
        Ok(Self {
            finder: SilencePointFinder::new(analyzer),
            trimmer: SilenceTrimmer::new(analyzer),
            config,
            logger,
        })
    }

    pub fn execute(
        &mut self,
        audio: AudioBuffer,
        boundaries: VoiceSegmentBoundaries,
        timings: &[WordTiming],
    ) -> Result<DialogSegmentation, SegmentationError> {
        let mut clock = StageClock::new();
        let mut diagnostics = Vec::new();
        self.logger.info(&format!(
            "Segmenting {:.3}s of audio ({} Hz, {} ch), {} words",
            audio.duration(),
            audio.sample_rate(),
            audio.channels(),
            timings.len()
        ));

        // 1. Refine both internal boundaries
        let radius = self.config.search_radius_sec;
        let first = self
            .finder
            .find_best_split_point(&audio, boundaries.setup_end, radius)?;
        let second = self
            .finder
            .find_best_split_point(&audio, boundaries.response_end, radius)?;
        for (rough, point) in [(boundaries.setup_end, &first), (boundaries.response_end, &second)] {
            self.logger.metric("boundary_shift_sec", point.time - rough);
            if let Some(d) = &point.degenerate {
                self.logger.warning(d);
                diagnostics.push(d.clone());
            }
        }
        clock.advance(self.logger.as_mut());

        // 2. Split into three contiguous segments; rounding happens once per boundary
        let total_frames = audio.frame_count();
        let first_frame = Splitter::frame_for(&audio, first.time)?;
        let second_frame = Splitter::frame_for(&audio, second.time)?;
        if second_frame < first_frame {
            return Err(RangeError::UnorderedBoundaries {
                first: first.time,
                second: second.time,
            }
            .into());
        }
        let slice_starts = [
            0.0,
            audio.frames_to_seconds(first_frame),
            audio.frames_to_seconds(second_frame),
        ];
        let (setup, rest) = Splitter::split_at_frame(audio, first_frame)?;
        let (response, punchline) = Splitter::split_at_frame(rest, second_frame - first_frame)?;
        debug_assert_eq!(
            setup.frame_count() + response.frame_count() + punchline.frame_count(),
            total_frames
        );
        clock.advance(self.logger.as_mut());

        // 3. Trim each segment independently
        let threshold_db = self.config.trim_threshold_db;
        let trimmer = &self.trimmer;
        let trimmed = [
            (Turn::Setup, slice_starts[0], setup),
            (Turn::Response, slice_starts[1], response),
            (Turn::Punchline, slice_starts[2], punchline),
        ]
        .map(|(turn, slice_start, segment)| {
            (turn, slice_start, trimmer.trim_silence(segment, threshold_db))
        });
        for (turn, _, trim) in &trimmed {
            self.logger.metric("leading_trim_sec", trim.leading_silence);
            self.logger.metric("trailing_trim_sec", trim.trailing_silence);
            if let Some(d) = &trim.degenerate {
                self.logger.info(&format!("{turn} turn has no audible speech"));
                self.logger.warning(d);
                diagnostics.push(d.clone());
            }
        }
        clock.advance(self.logger.as_mut());

        // 4. Re-base word timings: slice start and leading trim both shift the origin
        let segments = trimmed.map(|(turn, slice_start, trim)| {
            let timings = TimingAdjuster::shift_timings(
                timings,
                slice_start,
                trim.leading_silence,
                trim.audio.duration(),
            );
            SegmentOutput {
                turn,
                timings,
                slice_start,
                leading_trim: trim.leading_silence,
                trailing_trim: trim.trailing_silence,
                degenerate: trim.degenerate,
                audio: trim.audio,
            }
        });
        clock.advance(self.logger.as_mut());

        // 5. Done
        for segment in &segments {
            self.logger.info(&format!(
                "{}: {:.3}s clip, {} words",
                segment.turn,
                segment.audio.duration(),
                segment.timings.len()
            ));
        }
        clock.advance(self.logger.as_mut());
        self.logger.summary();

        Ok(DialogSegmentation {
            segments,
            split_points: [first, second],
            diagnostics,
        })
    }
}
