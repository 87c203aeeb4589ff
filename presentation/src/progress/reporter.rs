//! Progress reporting for council rounds

use council_application::ports::progress::CouncilProgress;
use council_domain::Role;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports round progress with a console progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CouncilProgress for ProgressReporter {
    fn on_round_start(&self, total_roles: usize) {
        let bar = ProgressBar::new(total_roles as u64);
        bar.set_style(Self::style());
        bar.set_prefix("Consulting domains");

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_role_complete(&self, role: Role, success: bool) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                if success {
                    bar.set_message(role.to_string());
                } else {
                    bar.set_message(format!("{} (fallback)", role));
                }
                bar.inc(1);
            }
        }
    }

    fn on_round_complete(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}
