//! Full-screen druid surface hosting a [`SnipSession`].

use std::cell::RefCell;
use std::rc::Rc;

use druid::kurbo::{Affine, BezPath, Shape};
use druid::piet::{
    FontFamily, ImageFormat, InterpolationMode, PietImage, PietTextLayout, Text, TextLayout,
    TextLayoutBuilder,
};
use druid::{
    AppLauncher, BoxConstraints, Color, Cursor, Env, Event, EventCtx, KbKey, LayoutCtx, LifeCycle,
    LifeCycleCtx, MouseButton, PaintCtx, Point, Rect, RenderContext, Scale, Size, UpdateCtx,
    Widget, WindowDesc,
};
use log::{debug, error, warn};

use crate::capture::{CaptureError, ScreenSource};
use crate::geometry::{LocalPoint, LocalRect, ScreenRect};
use crate::scene::{self, Scene, Tint};
use crate::selection::{Button, Response};
use crate::snip::{InputEvent, OverlayOptions, SnipSession};

const LABEL_FONT_SIZE: f64 = 12.0;

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("background capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("overlay window failed: {0}")]
    Platform(String),
}

type Slot = Rc<RefCell<Option<Result<Option<ScreenRect>, CaptureError>>>>;

/// Opens the overlay over `bounds` and blocks until the user selects a region
/// or cancels. `Ok(None)` means cancelled.
///
/// The window is borderless and always on top, but druid cannot mark it as a
/// tool window, so it may still get a taskbar and Alt-Tab entry.
pub fn get_selection<S>(
    bounds: ScreenRect,
    source: S,
    options: OverlayOptions,
) -> Result<Option<ScreenRect>, OverlayError>
where
    S: ScreenSource + 'static,
{
    let slot: Slot = Rc::default();
    let widget = SnipWidget {
        session: SnipSession::new(bounds, options),
        source,
        scale: Scale::default(),
        cached_image: None,
        slot: Rc::clone(&slot),
    };

    let window = WindowDesc::new(widget)
        .title("snipshot")
        .set_position((f64::from(bounds.x), f64::from(bounds.y)))
        .window_size((f64::from(bounds.width), f64::from(bounds.height)))
        .show_titlebar(false)
        .resizable(false)
        .transparent(true)
        .set_always_on_top(true);

    AppLauncher::with_window(window)
        .launch(())
        .map_err(|e| OverlayError::Platform(e.to_string()))?;

    let settled = slot.borrow_mut().take();
    match settled {
        Some(result) => Ok(result?),
        None => {
            warn!("overlay closed without a selection");
            Ok(None)
        }
    }
}

struct SnipWidget<S> {
    session: SnipSession,
    source: S,
    scale: Scale,
    cached_image: Option<PietImage>,
    slot: Slot,
}

impl<S: ScreenSource> SnipWidget<S> {
    fn settle(&mut self, ctx: &mut EventCtx, result: Result<Option<ScreenRect>, CaptureError>) {
        let mut slot = self.slot.borrow_mut();
        if slot.is_none() {
            *slot = Some(result);
        }
        self.cached_image = None;
        ctx.submit_command(druid::commands::QUIT_APP);
    }

    fn connect(&mut self, ctx: &mut EventCtx) -> Response {
        match ctx.window().get_scale() {
            Ok(scale) => self.scale = scale,
            Err(e) => warn!("could not read window scale, assuming 1.0: {e}"),
        }

        // Window geometry is in display points; bounds are device pixels.
        let bounds = self.session.bounds();
        let (sx, sy) = (self.scale.x(), self.scale.y());
        let window = ctx.window();
        window.set_position((f64::from(bounds.x) / sx, f64::from(bounds.y) / sy));
        window.set_size((f64::from(bounds.width) / sx, f64::from(bounds.height) / sy));

        ctx.request_focus();
        ctx.set_cursor(&Cursor::Crosshair);

        match self.session.activate(&self.source) {
            Ok(response) => response,
            Err(e) => {
                error!("{e}");
                self.settle(ctx, Err(e));
                Response::Ignored
            }
        }
    }
}

/// Display points from druid to overlay-local device pixels.
fn to_local(pos: Point, scale: Scale) -> LocalPoint {
    LocalPoint::new(
        (pos.x * scale.x()).round() as i32,
        (pos.y * scale.y()).round() as i32,
    )
}

fn button(b: MouseButton) -> Button {
    match b {
        MouseButton::Left => Button::Primary,
        MouseButton::Right => Button::Secondary,
        _ => Button::Other,
    }
}

fn to_rect(r: &LocalRect) -> Rect {
    Rect::new(
        f64::from(r.left()),
        f64::from(r.top()),
        f64::from(r.right()),
        f64::from(r.bottom()),
    )
}

impl<S: ScreenSource> Widget<()> for SnipWidget<S> {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, _data: &mut (), _env: &Env) {
        if self.session.is_closed() {
            return;
        }
        let response = match event {
            Event::WindowConnected => self.connect(ctx),
            Event::MouseDown(e) => {
                ctx.set_active(true);
                let at = to_local(e.pos, self.scale);
                self.session.handle(InputEvent::Press(button(e.button), at))
            }
            Event::MouseMove(e) => {
                ctx.set_cursor(&Cursor::Crosshair);
                let at = to_local(e.pos, self.scale);
                self.session.handle(InputEvent::Motion(at))
            }
            Event::MouseUp(e) => {
                ctx.set_active(false);
                let at = to_local(e.pos, self.scale);
                self.session.handle(InputEvent::Release(button(e.button), at))
            }
            Event::KeyDown(k) if k.key == KbKey::Escape => {
                self.session.handle(InputEvent::Escape)
            }
            _ => Response::Ignored,
        };

        match response {
            Response::Ignored => {}
            Response::Redraw => ctx.request_paint(),
            Response::Close(outcome) => {
                debug!("closing overlay with {outcome:?}");
                let result = self.session.result();
                self.settle(ctx, Ok(result));
            }
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifeCycleCtx, event: &LifeCycle, _data: &(), _env: &Env) {
        if let LifeCycle::WidgetAdded = event {
            ctx.register_for_focus();
        }
    }

    fn update(&mut self, _ctx: &mut UpdateCtx, _old: &(), _data: &(), _env: &Env) {}

    fn layout(
        &mut self,
        _ctx: &mut LayoutCtx,
        bc: &BoxConstraints,
        _data: &(),
        _env: &Env,
    ) -> Size {
        bc.max()
    }

    fn paint(&mut self, ctx: &mut PaintCtx, _data: &(), _env: &Env) {
        let Some(background) = self.session.background() else {
            return;
        };
        let (w, h) = background.dimensions();

        if self.cached_image.is_none() {
            self.cached_image = ctx
                .make_image(
                    w as usize,
                    h as usize,
                    background.as_raw(),
                    ImageFormat::RgbaSeparate,
                )
                .ok();
        }

        let font_size = LABEL_FONT_SIZE * self.scale.y();
        let mut layout: Option<PietTextLayout> = None;
        let scene = self.session.scene(|text| {
            layout = ctx
                .text()
                .new_text_layout(text.to_string())
                .font(FontFamily::SYSTEM_UI, font_size)
                .text_color(Color::WHITE)
                .build()
                .ok();
            let size = layout.as_ref().map(|l| l.size()).unwrap_or(Size::ZERO);
            (size.width, size.height)
        });
        let Some(scene) = scene else {
            return;
        };

        let (sx, sy) = (self.scale.x(), self.scale.y());
        let image = self.cached_image.as_ref();
        ctx.with_save(|ctx| {
            // Everything below is drawn in device pixels.
            ctx.transform(Affine::scale_non_uniform(1.0 / sx, 1.0 / sy));
            let surface = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
            if let Some(img) = image {
                ctx.draw_image(img, surface, InterpolationMode::NearestNeighbor);
            }
            draw_scene(ctx, surface, &scene, layout.as_ref());
        });
    }
}

fn draw_scene(ctx: &mut PaintCtx, surface: Rect, scene: &Scene, layout: Option<&PietTextLayout>) {
    let tint = Color::rgba8(0, 0, 0, scene::TINT_ALPHA);
    match scene.tint {
        Tint::Full => ctx.fill(surface, &tint),
        Tint::Inverted(sel) => {
            let mask: BezPath = surface
                .path_elements(0.1)
                .chain(to_rect(&sel).path_elements(0.1))
                .collect();
            ctx.fill_even_odd(mask, &tint);
        }
    }

    if let Some(r) = &scene.border {
        let (red, green, blue) = scene::BORDER_RGB;
        ctx.stroke(to_rect(r), &Color::rgb8(red, green, blue), scene::BORDER_WIDTH);
    }

    if let (Some(label), Some(layout)) = (&scene.label, layout) {
        let f = label.frame;
        ctx.fill(
            Rect::new(f.x, f.y, f.x + f.width, f.y + f.height),
            &Color::rgba8(0, 0, 0, scene::LABEL_BG_ALPHA),
        );
        ctx.draw_text(layout, label.text_origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_pass_through_at_unit_scale() {
        let scale = Scale::new(1.0, 1.0);
        assert_eq!(to_local(Point::new(0.0, 0.0), scale), LocalPoint::new(0, 0));
        assert_eq!(to_local(Point::new(640.0, 480.0), scale), LocalPoint::new(640, 480));
    }

    #[test]
    fn points_scale_to_device_pixels_and_round() {
        let scale = Scale::new(1.5, 1.5);
        assert_eq!(to_local(Point::new(100.0, 40.0), scale), LocalPoint::new(150, 60));
        assert_eq!(to_local(Point::new(10.3, 20.7), scale), LocalPoint::new(15, 31));
    }

    #[test]
    fn scaled_drag_yields_pixel_rect() {
        let scale = Scale::new(2.0, 2.0);
        let rect = LocalRect::from_points(
            to_local(Point::new(50.0, 60.0), scale),
            to_local(Point::new(10.0, 20.0), scale),
        );
        assert_eq!(rect.to_screen(LocalPoint::new(0, 0)), ScreenRect::new(20, 40, 80, 80));
    }

    #[test]
    fn mouse_buttons_map_to_roles() {
        assert_eq!(button(MouseButton::Left), Button::Primary);
        assert_eq!(button(MouseButton::Right), Button::Secondary);
        assert_eq!(button(MouseButton::Middle), Button::Other);
    }

    #[test]
    fn local_rect_converts_to_druid_rect() {
        let r = LocalRect::from_points(LocalPoint::new(30, 5), LocalPoint::new(10, 25));
        assert_eq!(to_rect(&r), Rect::new(10.0, 5.0, 30.0, 25.0));
    }
}
