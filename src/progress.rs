//! Shared progress bar setup.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BATCH_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} iterations ({percent}%) {msg}";

/// Create an iteration-based progress bar for a seeding batch.
///
/// Returns a hidden bar when `enabled` is false so callers can update it
/// unconditionally.
pub fn batch_progress_bar(total: u64, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(BATCH_TEMPLATE) {
        pb.set_style(
            style
                .progress_chars("█▓▒░  ")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Seeding collections...");
    pb
}
