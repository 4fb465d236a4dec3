use std::fmt;

use super::energy_analyzer::amplitude_to_db;

/// Soft condition raised when silence analysis has nothing useful to work with.
///
/// These never abort a request; the documented fallback value is used and the
/// condition is reported alongside the result.
#[derive(Clone, Debug, PartialEq)]
pub enum DegenerateSilence {
    /// The search window clamped to zero width; the rough timestamp was kept.
    CollapsedSearchWindow { rough_time: f64 },
    /// Energy across the search window showed no clear dip.
    FlatEnergy {
        rough_time: f64,
        min_energy: f64,
        max_energy: f64,
    },
    /// Every window was below the trim threshold; the clip trimmed to nothing.
    SilentClip { duration: f64 },
}

impl fmt::Display for DegenerateSilence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateSilence::CollapsedSearchWindow { rough_time } => write!(
                f,
                "search window around {rough_time:.3}s collapsed; keeping rough boundary"
            ),
            DegenerateSilence::FlatEnergy {
                rough_time,
                min_energy,
                max_energy,
            } => write!(
                f,
                "no clear silence near {rough_time:.3}s (energy {:.1}..{:.1} dBFS)",
                amplitude_to_db(*min_energy),
                amplitude_to_db(*max_energy)
            ),
            DegenerateSilence::SilentClip { duration } => {
                write!(f, "clip of {duration:.3}s is entirely below the trim threshold")
            }
        }
    }
}
