//! Window client rectangle and coordinate normalisation.
//!
//! # Coordinate systems (for beginners)
//!
//! `WM_POINTER*` messages report the contact position in **screen pixels**
//! with the origin at the top-left of the primary monitor and Y growing
//! downwards.  Host frameworks instead want a **normalised** position: a
//! fraction of the window's client area, with the origin at the bottom-left
//! and Y growing upwards.
//!
//! ```text
//!  screen pixels (top-down)           normalised (bottom-up)
//!  (left,top) ──────────► x           (0,1) ───────────── (1,1)
//!      │                                │                   │
//!      │    client area                 │    client area    │
//!      ▼ y                            (0,0) ───────────── (1,0)
//! ```
//!
//! Normalising divides by the client width and height, so an empty client
//! area (a minimised window, for instance) cannot be normalised at all.
//! [`ClientRect::normalize`] reports that case as [`DecodeError::EmptyClientRect`]
//! instead of producing infinities.

use thiserror::Error;

/// Error type for pointer message decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The client area has a zero dimension, so positions cannot be normalised.
    #[error("client rectangle is empty ({width}x{height}); cannot normalise position")]
    EmptyClientRect { width: u32, height: u32 },
}

/// The window's client area expressed in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientRect {
    /// Screen X of the client area's left edge.
    pub left: i32,
    /// Screen Y of the client area's top edge.
    pub top: i32,
    /// Client width in pixels.
    pub width: u32,
    /// Client height in pixels.
    pub height: u32,
}

impl ClientRect {
    /// A client rectangle anchored at the screen origin.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
        }
    }

    /// Returns `true` when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Converts a screen-pixel position into a normalised, bottom-up position.
    ///
    /// Positions inside the client area map into `[0.0, 1.0]` on both axes.
    /// Positions outside it (pen hovering over the title bar, say) map outside
    /// that range and are not clamped.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::EmptyClientRect`] when either dimension is zero.
    pub fn normalize(&self, screen_x: i32, screen_y: i32) -> Result<(f64, f64), DecodeError> {
        if self.is_empty() {
            return Err(DecodeError::EmptyClientRect {
                width: self.width,
                height: self.height,
            });
        }

        let x = f64::from(screen_x - self.left) / f64::from(self.width);
        let y = f64::from(screen_y - self.top) / f64::from(self.height);
        Ok((x, 1.0 - y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_centre_of_800x600() {
        // Arrange
        let rect = ClientRect::with_size(800, 600);

        // Act
        let (x, y) = rect.normalize(400, 150).expect("non-empty rect");

        // Assert
        assert_eq!(x, 0.5);
        assert_eq!(y, 0.75);
    }

    #[test]
    fn test_normalize_corners_map_to_unit_square() {
        let rect = ClientRect::with_size(1920, 1080);

        assert_eq!(rect.normalize(0, 0).unwrap(), (0.0, 1.0));
        assert_eq!(rect.normalize(1920, 1080).unwrap(), (1.0, 0.0));
        assert_eq!(rect.normalize(0, 1080).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_normalize_subtracts_client_origin() {
        // Arrange – client area starts at (100, 50) on screen
        let rect = ClientRect {
            left: 100,
            top: 50,
            width: 200,
            height: 100,
        };

        // Act
        let (x, y) = rect.normalize(150, 75).unwrap();

        // Assert
        assert_eq!(x, 0.25);
        assert_eq!(y, 0.75);
    }

    #[test]
    fn test_normalize_outside_client_area_is_not_clamped() {
        let rect = ClientRect::with_size(100, 100);

        let (x, y) = rect.normalize(-50, 150).unwrap();

        assert_eq!(x, -0.5);
        assert_eq!(y, -0.5);
    }

    #[test]
    fn test_normalize_zero_width_returns_error() {
        let rect = ClientRect::with_size(0, 600);

        let result = rect.normalize(10, 10);

        assert_eq!(
            result,
            Err(DecodeError::EmptyClientRect {
                width: 0,
                height: 600
            })
        );
    }

    #[test]
    fn test_normalize_zero_height_returns_error() {
        let rect = ClientRect::with_size(800, 0);
        assert!(rect.is_empty());
        assert!(rect.normalize(10, 10).is_err());
    }
}
