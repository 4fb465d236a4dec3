use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("time {time:.4}s is outside the buffer [0, {duration:.4}s]")]
    OutsideBuffer { time: f64, duration: f64 },
    #[error("frame {frame} is outside the buffer (0..={frames})")]
    FrameOutsideBuffer { frame: usize, frames: usize },
    #[error("invalid time range: start {start:.4}s, end {end:.4}s")]
    InvalidRange { start: f64, end: f64 },
    #[error("search radius must be non-negative and finite, got {0}")]
    InvalidRadius(f64),
    #[error("turn boundaries out of order: {first:.4}s then {second:.4}s")]
    UnorderedBoundaries { first: f64, second: f64 },
}

/// A start/end pair in seconds with `end >= start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Result<Self, RangeError> {
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// `[center - radius, center + radius]`, not yet clamped to any buffer.
    pub fn around(center: f64, radius: f64) -> Result<Self, RangeError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(RangeError::InvalidRadius(radius));
        }
        Self::new(center - radius, center + radius)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.duration() <= 0.0
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Intersects with `[0, duration]`.
    ///
    /// A range lying entirely outside collapses onto the nearest bound, so the
    /// result is always a valid (possibly zero-width) range inside the buffer.
    pub fn clamp_to(&self, duration: f64) -> Self {
        let upper = duration.max(0.0);
        let start = self.start.clamp(0.0, upper);
        let end = self.end.clamp(start, upper);
        Self { start, end }
    }
}
