//! Screen snapshot provider over `xcap`.
//!
//! The overlay and the CLI only see the [`ScreenSource`] trait, so the
//! interaction logic can run against a fake source in tests.

use image::{RgbaImage, imageops};
use log::{debug, warn};
use xcap::Monitor;

use crate::geometry::ScreenRect;

/// Capability interface for everything that touches the real screen.
pub trait ScreenSource {
    /// Union of every monitor area, in one coordinate space.
    fn virtual_bounds(&self) -> Result<ScreenRect, CaptureError>;

    /// Pixels of `bounds`, as an image sized exactly to it.
    fn capture_region(&self, bounds: ScreenRect) -> Result<RgbaImage, CaptureError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitors found")]
    NoMonitors,

    #[error("Capture region {0:?} is empty")]
    EmptyRegion(ScreenRect),

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),
}

/// Captures through `xcap`, compositing every monitor into one virtual screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapSource;

impl XcapSource {
    fn monitors() -> Result<Vec<(Monitor, ScreenRect)>, CaptureError> {
        let monitors = Monitor::all().map_err(enumeration)?;

        let mut placed = Vec::with_capacity(monitors.len());
        for monitor in monitors {
            let rect = monitor_rect(&monitor)?;
            debug!("monitor at {rect:?}");
            placed.push((monitor, rect));
        }

        if placed.is_empty() {
            return Err(CaptureError::NoMonitors);
        }
        Ok(placed)
    }
}

fn monitor_rect(monitor: &Monitor) -> Result<ScreenRect, CaptureError> {
    Ok(ScreenRect::new(
        monitor.x().map_err(enumeration)?,
        monitor.y().map_err(enumeration)?,
        monitor.width().map_err(enumeration)?,
        monitor.height().map_err(enumeration)?,
    ))
}

fn enumeration(e: impl std::fmt::Display) -> CaptureError {
    CaptureError::MonitorEnumeration(e.to_string())
}

impl ScreenSource for XcapSource {
    fn virtual_bounds(&self) -> Result<ScreenRect, CaptureError> {
        let monitors = Self::monitors()?;
        ScreenRect::union(monitors.iter().map(|(_, rect)| *rect)).ok_or(CaptureError::NoMonitors)
    }

    fn capture_region(&self, bounds: ScreenRect) -> Result<RgbaImage, CaptureError> {
        if bounds.is_empty() {
            return Err(CaptureError::EmptyRegion(bounds));
        }

        let mut canvas = RgbaImage::new(bounds.width, bounds.height);
        let mut captured = 0usize;

        for (monitor, rect) in Self::monitors()? {
            if rect.intersect(&bounds).is_none() {
                continue;
            }
            let shot = monitor
                .capture_image()
                .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
            if shot.width() != rect.width || shot.height() != rect.height {
                warn!(
                    "monitor image is {}x{} but reports {}x{}",
                    shot.width(),
                    shot.height(),
                    rect.width,
                    rect.height
                );
            }
            compose(&mut canvas, bounds, &shot, rect);
            captured += 1;
        }

        if captured == 0 {
            return Err(CaptureError::EmptyRegion(bounds));
        }
        debug!("captured {bounds:?} from {captured} monitor(s)");
        Ok(canvas)
    }
}

/// Pastes a monitor image placed at `at` into a canvas covering `bounds`.
/// Parts falling outside the canvas are clipped.
fn compose(canvas: &mut RgbaImage, bounds: ScreenRect, shot: &RgbaImage, at: ScreenRect) {
    let dx = i64::from(at.x) - i64::from(bounds.x);
    let dy = i64::from(at.y) - i64::from(bounds.y);
    imageops::replace(canvas, shot, dx, dy);
}
