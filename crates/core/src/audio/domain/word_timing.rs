use serde::{Deserialize, Serialize};

/// When a word is spoken, relative to the start of the buffer it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
}

impl WordTiming {
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: Some(text.into()),
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Same word with both timestamps moved earlier by `offset` seconds.
    pub fn shifted_back(&self, offset: f64) -> Self {
        Self {
            text: self.text.clone(),
            start_time: self.start_time - offset,
            end_time: self.end_time - offset,
        }
    }
}
