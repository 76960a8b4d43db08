//! Progress reporting for collaborator calls

use colored::Colorize;
use consent_application::ProgressNotifier;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per running request
///
/// Requests for several questions run concurrently, so spinners are keyed by
/// their label.
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_task_start(&self, label: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(label.to_string());
        pb.set_message("working...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bars) = self.bars.lock() {
            bars.insert(label.to_string(), pb);
        }
    }

    fn on_task_complete(&self, label: &str, fallback: bool) {
        let Some(pb) = self.bars.lock().ok().and_then(|mut bars| bars.remove(label)) else {
            return;
        };
        if fallback {
            pb.finish_with_message(format!("{} (fallback used)", "x".yellow()));
        } else {
            pb.finish_with_message(format!("{}", "v".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_task_start(&self, label: &str) {
        println!("{} {}", "->".cyan(), label.bold());
    }

    fn on_task_complete(&self, label: &str, fallback: bool) {
        if fallback {
            println!("  {} {} (fallback used)", "x".yellow(), label);
        } else {
            println!("  {} {}", "v".green(), label);
        }
    }
}
