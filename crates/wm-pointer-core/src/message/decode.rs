//! Pointer message decoder.
//!
//! Combines the three inputs the provider has for each message into one
//! [`PointerEventRecord`]:
//!
//! 1. The packed `lParam` screen position.
//! 2. The window's current [`ClientRect`], used to normalise that position.
//! 3. The [`PenInfo`] returned by the pointer-info query for the message's
//!    pointer id.
//!
//! The decoder is a pure function.  Deciding *whether* a message should be
//! decoded (lifecycle gating, failed lookups) is the interceptor's job.

use tracing::trace;

use super::codes::unpack_lparam;
use crate::domain::event::{EventKind, PointerEventRecord};
use crate::domain::geometry::{ClientRect, DecodeError};

/// Pen state reported by the OS for one pointer id.
///
/// A platform-neutral subset of Win32's `POINTER_PEN_INFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PenInfo {
    /// Pen pressure, normalised by the OS to 0..=1024.
    pub pressure: u32,
    /// Clockwise rotation in degrees.
    pub rotation: u32,
    pub tilt_x: i32,
    pub tilt_y: i32,
}

/// Decodes one pointer message into an event record.
///
/// # Errors
///
/// Returns [`DecodeError::EmptyClientRect`] if `rect` has a zero dimension.
pub fn decode_pointer_message(
    kind: EventKind,
    lparam: isize,
    rect: &ClientRect,
    pen: &PenInfo,
) -> Result<PointerEventRecord, DecodeError> {
    let (screen_x, screen_y) = unpack_lparam(lparam);
    let (x, y) = rect.normalize(screen_x, screen_y)?;

    trace!(%kind, screen_x, screen_y, x, y, pressure = pen.pressure, "decoded pointer message");

    Ok(PointerEventRecord {
        kind,
        x,
        y,
        pressure: pen.pressure,
        tilt_x: pen.tilt_x,
        tilt_y: pen.tilt_y,
        rotation: pen.rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::codes::pack_lparam;

    #[test]
    fn test_decode_down_message_in_800x600_window() {
        // Arrange
        let rect = ClientRect::with_size(800, 600);
        let pen = PenInfo {
            pressure: 512,
            ..PenInfo::default()
        };

        // Act
        let record =
            decode_pointer_message(EventKind::Begin, pack_lparam(400, 150), &rect, &pen).unwrap();

        // Assert
        assert_eq!(record.kind, EventKind::Begin);
        assert_eq!(record.x, 0.5);
        assert_eq!(record.y, 0.75);
        assert_eq!(record.pressure, 512);
    }

    #[test]
    fn test_decode_copies_tilt_and_rotation() {
        let rect = ClientRect::with_size(100, 100);
        let pen = PenInfo {
            pressure: 10,
            rotation: 90,
            tilt_x: -30,
            tilt_y: 15,
        };

        let record =
            decode_pointer_message(EventKind::Update, pack_lparam(10, 10), &rect, &pen).unwrap();

        assert_eq!(record.rotation, 90);
        assert_eq!(record.tilt_x, -30);
        assert_eq!(record.tilt_y, 15);
    }

    #[test]
    fn test_decode_with_empty_rect_fails_instead_of_dividing_by_zero() {
        let rect = ClientRect::with_size(0, 0);

        let result = decode_pointer_message(
            EventKind::Begin,
            pack_lparam(1, 1),
            &rect,
            &PenInfo::default(),
        );

        assert!(matches!(result, Err(DecodeError::EmptyClientRect { .. })));
    }
}
