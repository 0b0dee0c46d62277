//! Rectangles in absolute screen space and in overlay-local space.

/// Absolute screen-space rectangle, shared by every monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn origin(&self) -> LocalPoint {
        LocalPoint::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Overlapping area of two rectangles, if any.
    pub fn intersect(&self, other: &ScreenRect) -> Option<ScreenRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(ScreenRect::new(left, top, (right - left) as u32, (bottom - top) as u32))
        } else {
            None
        }
    }

    /// Bounding box of all rectangles: the virtual screen when fed monitor areas.
    pub fn union<I>(rects: I) -> Option<ScreenRect>
    where
        I: IntoIterator<Item = ScreenRect>,
    {
        rects.into_iter().fold(None, |acc, r| {
            Some(match acc {
                None => r,
                Some(a) => {
                    let left = a.x.min(r.x);
                    let top = a.y.min(r.y);
                    let right = a.right().max(r.right());
                    let bottom = a.bottom().max(r.bottom());
                    ScreenRect::new(left, top, (right - left) as u32, (bottom - top) as u32)
                }
            })
        })
    }
}

/// A point in overlay-local device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalPoint {
    pub x: i32,
    pub y: i32,
}

impl LocalPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Normalized overlay-local rectangle. `left <= right` and `top <= bottom` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl LocalRect {
    /// Builds the rectangle spanned by two corners given in any order.
    pub fn from_points(a: LocalPoint, b: LocalPoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top) as u32
    }

    /// Translates the rectangle into absolute screen space given the overlay's screen origin.
    pub fn to_screen(&self, origin: LocalPoint) -> ScreenRect {
        ScreenRect::new(
            origin.x + self.left,
            origin.y + self.top,
            self.width(),
            self.height(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> LocalPoint {
        LocalPoint::new(x, y)
    }

    #[test]
    fn normalize_is_symmetric_in_every_direction() {
        let corners = [pt(10, 10), pt(50, 10), pt(10, 50), pt(50, 50), pt(-7, 33)];
        for a in corners {
            for b in corners {
                let ab = LocalRect::from_points(a, b);
                let ba = LocalRect::from_points(b, a);
                assert_eq!(ab, ba);
                assert!(ab.left() <= ab.right());
                assert!(ab.top() <= ab.bottom());
                assert_eq!(ab.width() as i32, ab.right() - ab.left());
                assert_eq!(ab.height() as i32, ab.bottom() - ab.top());
            }
        }
    }

    #[test]
    fn drag_up_left_normalizes() {
        let r = LocalRect::from_points(pt(50, 50), pt(10, 10));
        assert_eq!((r.left(), r.top(), r.right(), r.bottom()), (10, 10, 50, 50));
        assert_eq!((r.width(), r.height()), (40, 40));
    }

    #[test]
    fn to_screen_adds_overlay_origin() {
        let r = LocalRect::from_points(pt(100, 40), pt(300, 240));
        assert_eq!(r.to_screen(pt(-1920, 0)), ScreenRect::new(-1820, 40, 200, 200));
        assert_eq!(r.to_screen(pt(0, 0)), ScreenRect::new(100, 40, 200, 200));
    }

    #[test]
    fn union_of_monitors_spans_negative_origin() {
        let left = ScreenRect::new(-1920, 0, 1920, 1080);
        let main = ScreenRect::new(0, 0, 2560, 1440);
        assert_eq!(
            ScreenRect::union([left, main]),
            Some(ScreenRect::new(-1920, 0, 4480, 1440))
        );
        assert_eq!(ScreenRect::union(Vec::new()), None);
    }

    #[test]
    fn intersect_clips_to_overlap() {
        let a = ScreenRect::new(0, 0, 100, 100);
        let b = ScreenRect::new(50, -20, 100, 40);
        assert_eq!(a.intersect(&b), Some(ScreenRect::new(50, 0, 50, 20)));
        assert_eq!(a.intersect(&ScreenRect::new(100, 0, 5, 5)), None);
    }
}
