// UI module for consistent terminal output with progress bars and styling

#![allow(clippy::print_stdout, clippy::print_stderr)]

use crate::assets::AssetDownloadProgress;
use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Check if stderr is a TTY (for interactive output)
fn is_tty() -> bool {
    Term::stderr().is_term()
}

fn hide_unless_tty(pb: ProgressBar) -> ProgressBar {
    if !is_tty() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb
}

/// Create a styled spinner for work of unknown length
pub fn spinner(message: &str) -> ProgressBar {
    let pb = hide_unless_tty(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(SPINNER_CHARS)
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }
    pb
}

/// Create a counting progress bar
pub fn progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = hide_unless_tty(ProgressBar::new(total));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:25.cyan/dim}] {pos}/{len}")
            .unwrap()
            .tick_chars(SPINNER_CHARS)
            .progress_chars("━━╺"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Move a bar to the reported collection download progress
pub fn show_progress(pb: &ProgressBar, progress: AssetDownloadProgress) {
    pb.set_length(progress.total as u64);
    pb.set_position(progress.completed as u64);
}

fn finish(pb: &ProgressBar, msg: String, to_stderr: bool) {
    if is_tty() {
        pb.set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        pb.finish_with_message(msg);
    } else {
        pb.finish_and_clear();
        if to_stderr {
            eprintln!("{}", msg);
        } else {
            println!("{}", msg);
        }
    }
}

/// Finish a bar or spinner with success
pub fn finish_success(pb: &ProgressBar, message: &str) {
    finish(pb, format!("{} {}", style("✓").green(), message), false);
}

/// Finish a bar or spinner with error
pub fn finish_error(pb: &ProgressBar, message: &str) {
    finish(pb, format!("{} {}", style("✗").red(), message), true);
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Print a dimmed/secondary message
pub fn dim(message: &str) {
    println!("{}", style(message).dim());
}

/// Print a labelled status line
pub fn status(prefix: &str, message: &str) {
    println!("{} {}", style(prefix).cyan().bold(), message);
}

/// Print machine-readable output
pub fn raw(message: &str) {
    println!("{}", message);
}
