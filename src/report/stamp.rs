//! Stamp placement on the last print page
//!
//! The stamp's horizontal offset is stored with the report. Rendering always
//! clamps it into the printable width, and dragging is an explicit state
//! machine driven by pointer events.

/// Clamp a stored offset into `[0, page_width - stamp_width]`
///
/// A stamp wider than the page sits at zero.
pub fn clamp_offset(x: f32, page_width: f32, stamp_width: f32) -> f32 {
    let max = (page_width - stamp_width).max(0.0);
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, max)
}

/// Pointer input, in the same units as the offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32 },
    Move { x: f32 },
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StampDrag {
    Idle {
        offset: f32,
    },
    Dragging {
        origin_pointer: f32,
        origin_offset: f32,
        offset: f32,
    },
}

/// Result of feeding one pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Nothing to persist
    Unchanged,
    /// Offset moved during a drag
    Moved,
    /// Drag released at a new offset that should be saved
    Released { offset: f32 },
}

impl StampDrag {
    /// Start idle at a stored offset, clamped for the page
    pub fn new(stored: f32, page_width: f32, stamp_width: f32) -> Self {
        Self::Idle {
            offset: clamp_offset(stored, page_width, stamp_width),
        }
    }

    pub fn offset(&self) -> f32 {
        match self {
            Self::Idle { offset } | Self::Dragging { offset, .. } => *offset,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Pure reducer: next state plus what the caller should do
    pub fn reduce(self, event: PointerEvent, page_width: f32, stamp_width: f32) -> (Self, DragOutcome) {
        match (self, event) {
            (Self::Idle { offset }, PointerEvent::Down { x }) => (
                Self::Dragging {
                    origin_pointer: x,
                    origin_offset: offset,
                    offset,
                },
                DragOutcome::Unchanged,
            ),
            (
                Self::Dragging {
                    origin_pointer,
                    origin_offset,
                    offset,
                },
                PointerEvent::Move { x },
            ) => {
                let next = clamp_offset(origin_offset + (x - origin_pointer), page_width, stamp_width);
                let outcome = if next == offset {
                    DragOutcome::Unchanged
                } else {
                    DragOutcome::Moved
                };
                (
                    Self::Dragging {
                        origin_pointer,
                        origin_offset,
                        offset: next,
                    },
                    outcome,
                )
            }
            (
                Self::Dragging {
                    origin_offset,
                    offset,
                    ..
                },
                PointerEvent::Up,
            ) => {
                let outcome = if offset == origin_offset {
                    DragOutcome::Unchanged
                } else {
                    DragOutcome::Released { offset }
                };
                (Self::Idle { offset }, outcome)
            }
            (Self::Dragging { origin_offset, .. }, PointerEvent::Cancel) => (
                Self::Idle {
                    offset: origin_offset,
                },
                DragOutcome::Moved,
            ),
            // Stray events (Move/Up while idle, Down while dragging)
            (state, _) => (state, DragOutcome::Unchanged),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: f32 = 510.0;
    const STAMP: f32 = 110.0;

    #[test]
    fn test_clamp_offset() {
        assert_eq!(clamp_offset(-50.0, PAGE, STAMP), 0.0);
        assert_eq!(clamp_offset(1000.0, PAGE, STAMP), 400.0);
        assert_eq!(clamp_offset(120.5, PAGE, STAMP), 120.5);
        assert_eq!(clamp_offset(30.0, 100.0, STAMP), 0.0);
        assert_eq!(clamp_offset(f32::NAN, PAGE, STAMP), 0.0);
    }

    #[test]
    fn test_stored_offset_is_clamped_on_load() {
        assert_eq!(StampDrag::new(1000.0, PAGE, STAMP).offset(), 400.0);
        assert_eq!(StampDrag::new(-50.0, PAGE, STAMP).offset(), 0.0);
    }

    #[test]
    fn test_drag_moves_by_pointer_delta_and_releases() {
        let drag = StampDrag::new(100.0, PAGE, STAMP);
        let (drag, outcome) = drag.reduce(PointerEvent::Down { x: 150.0 }, PAGE, STAMP);
        assert!(drag.is_dragging());
        assert_eq!(outcome, DragOutcome::Unchanged);

        let (drag, outcome) = drag.reduce(PointerEvent::Move { x: 200.0 }, PAGE, STAMP);
        assert_eq!(drag.offset(), 150.0);
        assert_eq!(outcome, DragOutcome::Moved);

        let (drag, outcome) = drag.reduce(PointerEvent::Up, PAGE, STAMP);
        assert!(!drag.is_dragging());
        assert_eq!(outcome, DragOutcome::Released { offset: 150.0 });
    }

    #[test]
    fn test_drag_clamps_at_edges() {
        let drag = StampDrag::new(380.0, PAGE, STAMP);
        let (drag, _) = drag.reduce(PointerEvent::Down { x: 0.0 }, PAGE, STAMP);
        let (drag, _) = drag.reduce(PointerEvent::Move { x: 500.0 }, PAGE, STAMP);
        assert_eq!(drag.offset(), 400.0);
        let (drag, _) = drag.reduce(PointerEvent::Move { x: -900.0 }, PAGE, STAMP);
        assert_eq!(drag.offset(), 0.0);
    }

    #[test]
    fn test_cancel_restores_origin() {
        let drag = StampDrag::new(50.0, PAGE, STAMP);
        let (drag, _) = drag.reduce(PointerEvent::Down { x: 10.0 }, PAGE, STAMP);
        let (drag, _) = drag.reduce(PointerEvent::Move { x: 60.0 }, PAGE, STAMP);
        let (drag, _) = drag.reduce(PointerEvent::Cancel, PAGE, STAMP);
        assert_eq!(drag, StampDrag::Idle { offset: 50.0 });
    }

    #[test]
    fn test_release_without_movement_saves_nothing() {
        let drag = StampDrag::new(50.0, PAGE, STAMP);
        let (drag, _) = drag.reduce(PointerEvent::Down { x: 10.0 }, PAGE, STAMP);
        let (_, outcome) = drag.reduce(PointerEvent::Up, PAGE, STAMP);
        assert_eq!(outcome, DragOutcome::Unchanged);
    }

    #[test]
    fn test_stray_events_are_ignored() {
        let idle = StampDrag::new(50.0, PAGE, STAMP);
        assert_eq!(idle.reduce(PointerEvent::Move { x: 99.0 }, PAGE, STAMP), (idle, DragOutcome::Unchanged));
        assert_eq!(idle.reduce(PointerEvent::Up, PAGE, STAMP), (idle, DragOutcome::Unchanged));
    }
}
