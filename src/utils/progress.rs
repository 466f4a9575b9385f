//! Spinner helpers using indicatif

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::Phase;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("    {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// One spinner that follows a conversion through its phases.
///
/// Only one phase is ever shown: each update replaces the message, and the
/// terminal phases stop the spinner.
pub struct PhaseSpinner {
    pb: ProgressBar,
}

impl PhaseSpinner {
    pub fn new() -> Self {
        Self {
            pb: create_spinner(&Phase::Validating.to_string()),
        }
    }

    /// Spinner that draws nothing, for compact output
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    pub fn update(&self, phase: Phase) {
        match phase {
            Phase::Done => self.pb.finish_and_clear(),
            Phase::Error => self.pb.abandon_with_message(format!("❌ {}", phase)),
            _ => self.pb.set_message(phase.to_string()),
        }
    }
}

impl Default for PhaseSpinner {
    fn default() -> Self {
        Self::new()
    }
}
