//! One region-selection interaction: background snapshot, drag state, result.
//!
//! `SnipSession` holds no toolkit types. The druid widget feeds it events
//! in device pixels and paints whatever [`Scene`] it reports.

use image::RgbaImage;
use log::{debug, info};

use crate::capture::{CaptureError, ScreenSource};
use crate::geometry::{LocalPoint, ScreenRect};
use crate::scene::Scene;
use crate::selection::{Button, Drag, Outcome, Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub show_label: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self { show_label: true }
    }
}

/// Input already translated to overlay-local device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Button, LocalPoint),
    Motion(LocalPoint),
    Release(Button, LocalPoint),
    Escape,
}

pub struct SnipSession {
    bounds: ScreenRect,
    options: OverlayOptions,
    background: Option<RgbaImage>,
    activated: bool,
    drag: Drag,
}

impl SnipSession {
    pub fn new(bounds: ScreenRect, options: OverlayOptions) -> Self {
        Self {
            bounds,
            options,
            background: None,
            activated: false,
            drag: Drag::default(),
        }
    }

    pub fn bounds(&self) -> ScreenRect {
        self.bounds
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.drag.outcome().is_some()
    }

    /// Freezes the desktop by capturing the background. Only the first call
    /// captures; later calls do nothing.
    pub fn activate(&mut self, source: &dyn ScreenSource) -> Result<Response, CaptureError> {
        if self.activated {
            return Ok(Response::Ignored);
        }
        self.activated = true;

        let snapshot = source.capture_region(self.bounds)?;
        debug!(
            "background {}x{} for {:?}",
            snapshot.width(),
            snapshot.height(),
            self.bounds
        );
        self.background = Some(snapshot);
        Ok(Response::Redraw)
    }

    pub fn handle(&mut self, event: InputEvent) -> Response {
        let response = match event {
            InputEvent::Press(button, at) => self.drag.press(button, at),
            InputEvent::Motion(at) => self.drag.motion(at),
            InputEvent::Release(button, at) => self.drag.release(button, at),
            InputEvent::Escape => self.drag.escape(),
        };

        if let Response::Close(outcome) = response {
            info!("selection closed: {outcome:?}");
            self.background = None;
        }
        response
    }

    /// Nothing is drawn until the background exists, so the surface never
    /// covers the desktop before the snapshot is taken.
    pub fn scene<F>(&self, measure: F) -> Option<Scene>
    where
        F: FnOnce(&str) -> (f64, f64),
    {
        self.background.as_ref()?;
        Some(Scene::build(&self.drag, self.options.show_label, measure))
    }

    /// Selected rectangle in absolute screen coordinates, or `None` when the
    /// user cancelled or the interaction has not finished.
    pub fn result(&self) -> Option<ScreenRect> {
        match self.drag.outcome()? {
            Outcome::Selected(rect) => Some(rect.to_screen(self.bounds.origin())),
            Outcome::Cancelled => None,
        }
    }
}
