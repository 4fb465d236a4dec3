use super::word_timing::WordTiming;

/// Re-bases word timings onto a clip cut out of a longer buffer.
pub struct TimingAdjuster;

impl TimingAdjuster {
    /// Shifts every word back by `slice_start + extra_leading_trim` and keeps
    /// only the words that reach into `[0, clip_duration]`.
    ///
    /// Both offsets are in the original time base and are summed: the slice
    /// start says where the segment began, the leading trim how much silence
    /// was then dropped from its front. Kept words are shifted, never clamped,
    /// so a word straddling a clip edge keeps its true boundaries.
    pub fn shift_timings(
        timings: &[WordTiming],
        slice_start: f64,
        extra_leading_trim: f64,
        clip_duration: f64,
    ) -> Vec<WordTiming> {
        let offset = slice_start + extra_leading_trim;
        timings
            .iter()
            .map(|w| w.shifted_back(offset))
            .filter(|w| w.end_time > 0.0 && w.start_time <= clip_duration)
            .collect()
    }
}
