//! What the overlay draws for a given drag state, independent of the toolkit.

use crate::geometry::LocalRect;
use crate::selection::Drag;

/// Alpha of the black tint over the unselected area (about 47%).
pub const TINT_ALPHA: u8 = 120;
/// Alpha of the box behind the dimension label.
pub const LABEL_BG_ALPHA: u8 = 170;
/// Deep sky blue.
pub const BORDER_RGB: (u8, u8, u8) = (0, 191, 255);
pub const BORDER_WIDTH: f64 = 2.0;

/// Gap between the selection's top edge and the label box.
pub const LABEL_MARGIN: f64 = 6.0;
const LABEL_PAD_X: f64 = 5.0;
const LABEL_PAD_Y: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tint {
    /// Dim the whole surface.
    Full,
    /// Dim everything except the rectangle (even-odd fill of surface and rect).
    Inverted(LocalRect),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub frame: LabelBox,
    /// Top-left of the text inside `frame`.
    pub text_origin: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub tint: Tint,
    pub border: Option<LocalRect>,
    pub label: Option<Label>,
}

/// Text shown in the dimension label.
pub fn label_text(rect: &LocalRect) -> String {
    format!("{} × {}", rect.width(), rect.height())
}

/// Positions the label box above the rectangle, or just inside its top edge
/// when that would leave the surface.
pub fn place_label(rect: &LocalRect, text_size: (f64, f64)) -> LabelBox {
    let (tw, th) = text_size;
    let x = f64::from(rect.left());
    let mut y = f64::from(rect.top()) - th - LABEL_MARGIN;
    if y < 0.0 {
        y = f64::from(rect.top()) + LABEL_MARGIN;
    }
    LabelBox {
        x,
        y,
        width: tw + 2.0 * LABEL_PAD_X,
        height: th + 2.0 * LABEL_PAD_Y,
    }
}

impl Scene {
    /// `measure` returns the rendered size of the label text; it is only
    /// called when a label will be shown.
    pub fn build<F>(drag: &Drag, show_label: bool, measure: F) -> Scene
    where
        F: FnOnce(&str) -> (f64, f64),
    {
        let Some(rect) = drag.rect() else {
            return Scene {
                tint: Tint::Full,
                border: None,
                label: None,
            };
        };

        let label = show_label.then(|| {
            let text = label_text(&rect);
            let frame = place_label(&rect, measure(&text));
            Label {
                text_origin: (frame.x + LABEL_PAD_X, frame.y + LABEL_PAD_Y),
                text,
                frame,
            }
        });

        Scene {
            tint: Tint::Inverted(rect),
            border: Some(rect),
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LocalPoint;
    use crate::selection::Button;

    fn rect(l: i32, t: i32, r: i32, b: i32) -> LocalRect {
        LocalRect::from_points(LocalPoint::new(l, t), LocalPoint::new(r, b))
    }

    fn dragging(from: (i32, i32), to: (i32, i32)) -> Drag {
        let mut d = Drag::default();
        d.press(Button::Primary, LocalPoint::new(from.0, from.1));
        d.motion(LocalPoint::new(to.0, to.1));
        d
    }

    #[test]
    fn idle_dims_everything() {
        let scene = Scene::build(&Drag::Idle, true, |_| panic!("no label when idle"));
        assert_eq!(scene.tint, Tint::Full);
        assert_eq!(scene.border, None);
        assert_eq!(scene.label, None);
    }

    #[test]
    fn dragging_inverts_mask_and_outlines_selection() {
        let scene = Scene::build(&dragging((300, 200), (100, 50)), true, |_| (60.0, 14.0));
        let r = rect(100, 50, 300, 200);
        assert_eq!(scene.tint, Tint::Inverted(r));
        assert_eq!(scene.border, Some(r));

        let label = scene.label.unwrap();
        assert_eq!(label.text, "200 × 150");
        assert_eq!(
            label.frame,
            LabelBox {
                x: 100.0,
                y: 50.0 - 14.0 - 6.0,
                width: 70.0,
                height: 20.0
            }
        );
        assert_eq!(label.text_origin, (105.0, 33.0));
    }

    #[test]
    fn label_moves_inside_when_above_would_clip() {
        let frame = place_label(&rect(10, 12, 90, 90), (40.0, 14.0));
        assert_eq!(frame.y, 18.0);

        let frame = place_label(&rect(10, 20, 90, 90), (40.0, 14.0));
        assert_eq!(frame.y, 0.0);
    }

    #[test]
    fn label_can_be_hidden() {
        let scene = Scene::build(&dragging((0, 0), (50, 50)), false, |_| panic!("not measured"));
        assert!(scene.label.is_none());
        assert!(scene.border.is_some());
    }

    #[test]
    fn finished_drag_draws_plain_tint() {
        let mut d = dragging((0, 0), (50, 50));
        d.escape();
        let scene = Scene::build(&d, true, |_| (1.0, 1.0));
        assert_eq!(scene.tint, Tint::Full);
    }
}
