use super::audio_buffer::AudioBuffer;
use super::degenerate_silence::DegenerateSilence;
use super::energy_analyzer::{EnergyAnalyzer, EnergyWindow};
use crate::shared::constants::{ENERGY_TIE_EPSILON, FLAT_ENERGY_SPREAD};
use crate::shared::time_range::{RangeError, TimeRange};

/// A refined cut position in the time base of the buffer that was searched.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPoint {
    pub time: f64,
    /// Search window after clamping to the buffer.
    pub search_window: TimeRange,
    pub degenerate: Option<DegenerateSilence>,
}

/// Finds the quietest instant near a rough boundary estimate.
pub struct SilencePointFinder {
    analyzer: EnergyAnalyzer,
}

impl SilencePointFinder {
    pub fn new(analyzer: EnergyAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Searches `[rough - radius, rough + radius]`, clamped to the buffer.
    pub fn find_best_split_point(
        &self,
        audio: &AudioBuffer,
        rough_time: f64,
        radius: f64,
    ) -> Result<SplitPoint, RangeError> {
        if !rough_time.is_finite() {
            return Err(RangeError::OutsideBuffer {
                time: rough_time,
                duration: audio.duration(),
            });
        }
        let window = TimeRange::around(rough_time, radius)?.clamp_to(audio.duration());
        Ok(self.find_in_window(audio, rough_time, window))
    }

    /// Picks the centre of the lowest-energy analysis window inside `window`.
    ///
    /// Energies within [`ENERGY_TIE_EPSILON`] are equal; among equals the
    /// window whose centre is nearest `rough_time` wins, and the earlier one
    /// on an exact distance tie. A zero-width window returns `rough_time`.
    ///
    /// The result lands within one analysis window of a gap's centre only
    /// when the gap is about two windows wide. In a wider gap every interior
    /// window ties, so the cut goes to the silent window nearest `rough_time`.
    pub fn find_in_window(
        &self,
        audio: &AudioBuffer,
        rough_time: f64,
        window: TimeRange,
    ) -> SplitPoint {
        let collapsed = SplitPoint {
            time: rough_time,
            search_window: window,
            degenerate: Some(DegenerateSilence::CollapsedSearchWindow { rough_time }),
        };
        if window.is_empty() {
            return collapsed;
        }

        let windows = self.analyzer.windowed_rms(audio, window);
        let Some(best) = quietest(&windows, rough_time) else {
            return collapsed;
        };

        let (min_energy, max_energy) = energy_bounds(&windows);
        let degenerate = if max_energy > 0.0 && max_energy - min_energy < FLAT_ENERGY_SPREAD * max_energy
        {
            Some(DegenerateSilence::FlatEnergy {
                rough_time,
                min_energy,
                max_energy,
            })
        } else {
            None
        };

        SplitPoint {
            // Frame rounding can push a clipped window's centre past the window edge.
            time: best.timestamp().clamp(window.start(), window.end()),
            search_window: window,
            degenerate,
        }
    }
}

impl Default for SilencePointFinder {
    fn default() -> Self {
        Self::new(EnergyAnalyzer::default())
    }
}

fn quietest(windows: &[EnergyWindow], rough_time: f64) -> Option<&EnergyWindow> {
    let (first, rest) = windows.split_first()?;
    let mut best = first;
    for w in rest {
        let diff = w.energy - best.energy;
        let closer = (w.timestamp() - rough_time).abs() < (best.timestamp() - rough_time).abs();
        if diff < -ENERGY_TIE_EPSILON || (diff.abs() <= ENERGY_TIE_EPSILON && closer) {
            best = w;
        }
    }
    Some(best)
}

fn energy_bounds(windows: &[EnergyWindow]) -> (f64, f64) {
    windows
        .iter()
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), w| {
            (lo.min(w.energy), hi.max(w.energy))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_buffer::SampleFormat;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    const RATE: u32 = 16000;

    /// Builds a mono buffer from `(seconds, is_tone)` parts, with one continuous sine phase.
    fn tone_and_gaps(parts: &[(f64, bool)]) -> AudioBuffer {
        let mut samples = Vec::new();
        for &(secs, tone) in parts {
            let len = (secs * RATE as f64).round() as usize;
            for _ in 0..len {
                let t = samples.len() as f64 / RATE as f64;
                let s = if tone {
                    0.8 * (2.0 * std::f64::consts::PI * 440.0 * t).sin()
                } else {
                    0.0
                };
                samples.push(s as f32);
            }
        }
        AudioBuffer::new(samples, RATE, 1, SampleFormat::Int16)
    }

    #[rstest]
    #[case::early(-0.15)]
    #[case::slightly_early(-0.07)]
    #[case::exact(0.0)]
    #[case::slightly_late(0.05)]
    #[case::late(0.15)]
    fn test_two_window_gap_center_found_within_one_window(#[case] offset: f64) {
        let audio = tone_and_gaps(&[(1.0, true), (0.04, false), (1.0, true)]);
        let gap_center = 1.02;
        let finder = SilencePointFinder::default();

        let point = finder
            .find_best_split_point(&audio, gap_center + offset, 0.2)
            .unwrap();

        assert_abs_diff_eq!(point.time, gap_center, epsilon = 0.02);
        assert!(point.degenerate.is_none());
    }

    #[test]
    fn test_wide_gap_cut_goes_to_silent_window_nearest_rough_time() {
        let audio = tone_and_gaps(&[(2.0, true), (0.4, false), (1.6, true)]);
        let point = SilencePointFinder::default()
            .find_best_split_point(&audio, 1.9, 0.2)
            .unwrap();
        assert!(point.time > 2.0 && point.time < 2.4, "got {}", point.time);
        // First fully silent window starts at 2.0s; the gap centre is 2.2s.
        assert_abs_diff_eq!(point.time, 2.01, epsilon = 1e-6);
    }

    #[test]
    fn test_result_lies_within_search_window() {
        let audio = tone_and_gaps(&[(1.0, true), (0.3, false), (1.0, true)]);
        let point = SilencePointFinder::default()
            .find_best_split_point(&audio, 0.7, 0.2)
            .unwrap();
        assert!(point.search_window.contains(point.time));
        assert_abs_diff_eq!(point.search_window.start(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(point.search_window.end(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_equal_dips_prefer_the_one_nearer_rough_time() {
        let audio = tone_and_gaps(&[
            (0.5, true),
            (0.04, false),
            (0.96, true),
            (0.04, false),
            (0.5, true),
        ]);
        let point = SilencePointFinder::default()
            .find_best_split_point(&audio, 1.2, 1.0)
            .unwrap();
        assert_abs_diff_eq!(point.time, 1.52, epsilon = 0.02);
    }

    #[test]
    fn test_window_clamped_at_start_still_searches() {
        let audio = tone_and_gaps(&[(0.05, false), (1.0, true)]);
        let point = SilencePointFinder::default()
            .find_best_split_point(&audio, 0.0, 0.2)
            .unwrap();
        assert_eq!(point.search_window.start(), 0.0);
        assert!(point.time < 0.05);
        assert!(point.degenerate.is_none());
    }

    #[test]
    fn test_zero_radius_falls_back_to_rough_time() {
        let audio = tone_and_gaps(&[(1.0, true)]);
        let point = SilencePointFinder::default()
            .find_best_split_point(&audio, 0.4, 0.0)
            .unwrap();
        assert_eq!(point.time, 0.4);
        assert_eq!(
            point.degenerate,
            Some(DegenerateSilence::CollapsedSearchWindow { rough_time: 0.4 })
        );
    }

    #[test]
    fn test_rough_time_past_end_is_returned_unchanged() {
        let audio = tone_and_gaps(&[(1.0, true)]);
        let point = SilencePointFinder::default()
            .find_best_split_point(&audio, 2.0, 0.2)
            .unwrap();
        assert_eq!(point.time, 2.0);
        assert!(matches!(
            point.degenerate,
            Some(DegenerateSilence::CollapsedSearchWindow { .. })
        ));
    }

    #[test]
    fn test_flat_energy_still_returns_deterministic_point() {
        let audio = AudioBuffer::new(vec![0.5; 2000], 1000, 1, SampleFormat::Int16);
        let finder = SilencePointFinder::default();
        let first = finder.find_best_split_point(&audio, 1.0, 0.2).unwrap();
        let second = finder.find_best_split_point(&audio, 1.0, 0.2).unwrap();

        assert_abs_diff_eq!(first.time, 1.0, epsilon = 1e-9);
        assert_eq!(first, second);
        assert!(matches!(
            first.degenerate,
            Some(DegenerateSilence::FlatEnergy { .. })
        ));
    }

    #[test]
    fn test_all_silent_window_is_not_flagged_flat() {
        let audio = AudioBuffer::new(vec![0.0; 2000], 1000, 1, SampleFormat::Int16);
        let point = SilencePointFinder::default()
            .find_best_split_point(&audio, 1.0, 0.2)
            .unwrap();
        assert_abs_diff_eq!(point.time, 1.0, epsilon = 1e-9);
        assert!(point.degenerate.is_none());
    }

    #[test]
    fn test_negative_radius_is_rejected() {
        let audio = tone_and_gaps(&[(1.0, true)]);
        assert_eq!(
            SilencePointFinder::default().find_best_split_point(&audio, 0.5, -0.1),
            Err(RangeError::InvalidRadius(-0.1))
        );
    }

    #[test]
    fn test_non_finite_rough_time_is_rejected() {
        let audio = tone_and_gaps(&[(1.0, true)]);
        assert!(SilencePointFinder::default()
            .find_best_split_point(&audio, f64::NAN, 0.2)
            .is_err());
    }
}
