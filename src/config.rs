//! Command-line options.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use crate::snip::OverlayOptions;

#[derive(Debug, Parser)]
#[command(
    name = "snipshot",
    version,
    about = "Capture the screen or a dragged region to a bitmap and the clipboard"
)]
pub struct Args {
    /// Drag a rectangle over a frozen copy of the desktop instead of capturing everything.
    #[arg(long)]
    pub snip: bool,

    /// Directory for the bitmap (defaults to the desktop).
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Do not copy the capture to the clipboard.
    #[arg(long)]
    pub no_clipboard: bool,

    /// Hide the "width × height" label while dragging.
    #[arg(long)]
    pub no_label: bool,

    /// More logging; repeat for debug output.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn output_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .or_else(dirs::desktop_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn overlay_options(&self) -> OverlayOptions {
        OverlayOptions {
            show_label: !self.no_label,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_capture_everything_with_label() {
        let args = Args::parse_from(["snipshot"]);
        assert!(!args.snip);
        assert!(!args.no_clipboard);
        assert!(args.overlay_options().show_label);
        assert_eq!(args.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn flags_are_parsed() {
        let args = Args::parse_from([
            "snipshot",
            "--snip",
            "--no-label",
            "--no-clipboard",
            "-o",
            "/tmp/shots",
            "-vv",
        ]);
        assert!(args.snip);
        assert!(args.no_clipboard);
        assert!(!args.overlay_options().show_label);
        assert_eq!(args.output_dir(), PathBuf::from("/tmp/shots"));
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
