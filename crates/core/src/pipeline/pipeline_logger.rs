use std::collections::HashMap;
use std::time::Instant;

use crate::audio::domain::degenerate_silence::DegenerateSilence;

/// Cross-cutting logger for segmentation pipeline events.
///
/// Decouples the use case from specific output mechanisms so embedders can
/// observe stage timings and soft failures without changing orchestration.
pub trait PipelineLogger: Send {
    /// Record how long a named pipeline stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. refined boundary shift, trimmed seconds).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Report a degenerate-silence fallback. The pipeline continues regardless.
    fn warning(&mut self, diagnostic: &DegenerateSilence);

    /// Emit an end-of-request summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
    fn warning(&mut self, _diagnostic: &DegenerateSilence) {}
}

/// Logger that forwards to the `log` facade and keeps per-stage timings,
/// metrics and warnings for a summary report.
pub struct LogPipelineLogger {
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    warnings: Vec<DegenerateSilence>,
}

impl LogPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            warnings: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() && self.warnings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!("Segmentation summary ({elapsed_ms:.1}ms total):")];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let total_ms: f64 = self.timings[stage].iter().sum();
            lines.push(format!("  {stage:18}: {total_ms:8.2}ms"));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let rendered: Vec<String> = values.iter().map(|v| format!("{v:.3}")).collect();
            lines.push(format!("  {name}: {}", rendered.join(", ")));
        }

        if !self.warnings.is_empty() {
            lines.push(format!("  Warnings: {}", self.warnings.len()));
            for w in &self.warnings {
                lines.push(format!("    - {w}"));
            }
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn warnings(&self) -> &[DegenerateSilence] {
        &self.warnings
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        log::debug!("{stage} took {duration_ms:.2}ms");
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn warning(&mut self, diagnostic: &DegenerateSilence) {
        log::warn!("{diagnostic}");
        self.warnings.push(diagnostic.clone());
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
