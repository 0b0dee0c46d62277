//! Drag-to-select state machine.

use crate::geometry::{LocalPoint, LocalRect};

/// Selections narrower or shorter than this are treated as a stray click.
pub const MIN_SELECTION_SIZE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Other,
}

/// How an interaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Selected(LocalRect),
    Cancelled,
}

/// What the surface should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ignored,
    Redraw,
    Close(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Drag {
    /// Nothing pressed yet.
    #[default]
    Idle,
    Dragging {
        start: LocalPoint,
        current: LocalPoint,
    },
    /// Terminal: every later event is ignored.
    Done(Outcome),
}

impl Drag {
    pub fn press(&mut self, button: Button, at: LocalPoint) -> Response {
        match *self {
            Drag::Done(_) => Response::Ignored,
            _ if button != Button::Primary => Response::Ignored,
            _ => {
                *self = Drag::Dragging {
                    start: at,
                    current: at,
                };
                Response::Redraw
            }
        }
    }

    pub fn motion(&mut self, at: LocalPoint) -> Response {
        match self {
            Drag::Dragging { current, .. } => {
                *current = at;
                Response::Redraw
            }
            _ => Response::Ignored,
        }
    }

    pub fn release(&mut self, button: Button, at: LocalPoint) -> Response {
        let Drag::Dragging { start, .. } = *self else {
            return Response::Ignored;
        };
        if button != Button::Primary {
            return Response::Ignored;
        }

        let rect = LocalRect::from_points(start, at);
        let outcome = if rect.width() < MIN_SELECTION_SIZE || rect.height() < MIN_SELECTION_SIZE {
            Outcome::Cancelled
        } else {
            Outcome::Selected(rect)
        };
        self.finish(outcome)
    }

    pub fn escape(&mut self) -> Response {
        self.finish(Outcome::Cancelled)
    }

    fn finish(&mut self, outcome: Outcome) -> Response {
        if let Drag::Done(_) = self {
            return Response::Ignored;
        }
        *self = Drag::Done(outcome);
        Response::Close(outcome)
    }

    /// Normalized rectangle of the drag in progress.
    pub fn rect(&self) -> Option<LocalRect> {
        match *self {
            Drag::Dragging { start, current } => Some(LocalRect::from_points(start, current)),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match *self {
            Drag::Done(outcome) => Some(outcome),
            _ => None,
        }
    }
}
