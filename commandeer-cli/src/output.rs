//! # Output Formatting
//!
//! Formatted output functions with colors, emojis, and consistent styling
//! for messages printed by command handlers.

use owo_colors::{OwoColorize, Stream};

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  #[default]
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply this mode to every subsequent colored write
  pub fn apply(self) {
    match self {
      ColorMode::Yes | ColorMode::Always => owo_colors::set_override(true),
      ColorMode::No | ColorMode::Never => owo_colors::set_override(false),
      ColorMode::Auto => owo_colors::unset_override(),
    }
  }
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
#[allow(clippy::print_stdout)]
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("white_check_mark", "✓");
  println!(
    "{} {}",
    check.if_supports_color(Stream::Stdout, |text| text.green()),
    message
  );
}

/// Print an error message
#[allow(clippy::print_stderr)]
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("x", "✗");
  eprintln!(
    "{} {}",
    cross.if_supports_color(Stream::Stderr, |text| text.red()),
    message
  );
}

/// Print a warning message
#[allow(clippy::print_stdout)]
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!(
    "{} {}",
    warning.if_supports_color(Stream::Stdout, |text| text.yellow()),
    message
  );
}

/// Print an info message
#[allow(clippy::print_stdout)]
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information_source", "ℹ");
  println!(
    "{} {}",
    info.if_supports_color(Stream::Stdout, |text| text.blue()),
    message
  );
}

/// Format a command name for display
pub fn format_command(cmd: &str) -> String {
  cmd.if_supports_color(Stream::Stdout, |text| text.purple()).to_string()
}
