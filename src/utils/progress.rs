//! Progress bars for bulk phases

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{msg:<22} {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) ETA {eta}";

/// Create a progress bar, hidden when `enabled` is false
pub fn progress_bar(len: usize, message: impl Into<String>, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    let bar = ProgressBar::new(len as u64);
    bar.set_style(style);
    bar.set_message(message.into());
    bar
}
