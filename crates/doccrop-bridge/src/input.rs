// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input adapter — folds mouse and touch events into `PointerSample`s so the
// editor state machine never sees the input device.

use doccrop_core::{Point, PointerPhase, PointerSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Down,
    Move,
    Up,
    /// The cursor left the surface.
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Start,
    Move,
    End,
    Cancel,
}

/// A pointer event as delivered by the shell, in client coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPointerEvent {
    Mouse {
        kind: MouseKind,
        client: Point,
    },
    Touch {
        kind: TouchKind,
        /// Touches still on the surface.
        touches: Vec<Point>,
        /// Touches that changed in this event (the lifted finger on `End`).
        changed: Vec<Point>,
    },
}

impl RawPointerEvent {
    pub fn mouse(kind: MouseKind, x: f32, y: f32) -> Self {
        Self::Mouse {
            kind,
            client: Point::new(x, y),
        }
    }

    pub fn touch(kind: TouchKind, touches: Vec<Point>, changed: Vec<Point>) -> Self {
        Self::Touch {
            kind,
            touches,
            changed,
        }
    }

    /// Convert to a device-neutral sample.
    ///
    /// Touch input follows the first finger. Start and move events without
    /// any touch position are dropped; end and cancel events always produce a
    /// sample so a drag can never get stuck.
    pub fn to_sample(&self) -> Option<PointerSample> {
        match self {
            Self::Mouse { kind, client } => {
                let phase = match kind {
                    MouseKind::Down => PointerPhase::Down,
                    MouseKind::Move => PointerPhase::Move,
                    MouseKind::Up => PointerPhase::Up,
                    MouseKind::Leave => PointerPhase::Cancel,
                };
                Some(PointerSample::new(phase, *client))
            }
            Self::Touch {
                kind,
                touches,
                changed,
            } => {
                let position = touches.first().or(changed.first()).copied();
                match kind {
                    TouchKind::Start => position.map(|p| PointerSample::new(PointerPhase::Down, p)),
                    TouchKind::Move => position.map(|p| PointerSample::new(PointerPhase::Move, p)),
                    TouchKind::End => Some(PointerSample::new(
                        PointerPhase::Up,
                        position.unwrap_or_default(),
                    )),
                    TouchKind::Cancel => Some(PointerSample::new(
                        PointerPhase::Cancel,
                        position.unwrap_or_default(),
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_leave_cancels() {
        let sample = RawPointerEvent::mouse(MouseKind::Leave, 4.0, 5.0).to_sample().unwrap();
        assert_eq!(sample.phase, PointerPhase::Cancel);
        assert_eq!(sample.client, Point::new(4.0, 5.0));
    }

    #[test]
    fn touch_and_mouse_produce_identical_samples() {
        let mouse = RawPointerEvent::mouse(MouseKind::Down, 12.0, 30.0).to_sample();
        let touch = RawPointerEvent::touch(
            TouchKind::Start,
            vec![Point::new(12.0, 30.0), Point::new(90.0, 90.0)],
            vec![Point::new(12.0, 30.0)],
        )
        .to_sample();
        assert_eq!(mouse, touch);
    }

    #[test]
    fn touch_end_uses_changed_touch() {
        let sample = RawPointerEvent::touch(TouchKind::End, vec![], vec![Point::new(7.0, 8.0)])
            .to_sample()
            .unwrap();
        assert_eq!(sample, PointerSample::up(7.0, 8.0));
    }

    #[test]
    fn touch_end_without_positions_still_releases() {
        let sample = RawPointerEvent::touch(TouchKind::Cancel, vec![], vec![])
            .to_sample()
            .unwrap();
        assert_eq!(sample.phase, PointerPhase::Cancel);
    }

    #[test]
    fn touch_move_without_positions_is_dropped() {
        assert!(RawPointerEvent::touch(TouchKind::Move, vec![], vec![]).to_sample().is_none());
    }
}
