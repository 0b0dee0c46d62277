use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

mod capture;
mod config;
mod geometry;
mod output;
mod scene;
mod selection;
mod snip;
mod widget;

use capture::{ScreenSource, XcapSource};
use config::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level().as_str()),
    )
    .init();

    let source = XcapSource;
    let virtual_bounds = source
        .virtual_bounds()
        .context("could not determine the virtual screen bounds")?;
    info!("virtual screen {virtual_bounds:?}");

    let region = if args.snip {
        match widget::get_selection(virtual_bounds, source, args.overlay_options())? {
            Some(region) => region,
            None => {
                info!("selection cancelled");
                return Ok(());
            }
        }
    } else {
        virtual_bounds
    };

    let image = source
        .capture_region(region)
        .with_context(|| format!("could not capture {region:?}"))?;

    let path = output::save_bitmap(&image, &args.output_dir(), chrono::Local::now())?;

    if !args.no_clipboard {
        if let Err(e) = output::copy_to_clipboard(&image) {
            warn!("{e}");
        }
    }

    println!("Saved: {}", path.display());
    Ok(())
}
