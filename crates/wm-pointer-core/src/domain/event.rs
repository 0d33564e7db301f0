//! Pointer lifecycle kinds and the decoded event record.

use std::fmt;

/// Lifecycle transition carried by a [`PointerEventRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A contact started (pen entered range or touched down).
    Begin,
    /// The active contact moved or its pressure changed.
    Update,
    /// The active contact lifted or left range.
    End,
}

impl EventKind {
    /// Lower-case name used by host frameworks (`"begin"`, `"update"`, `"end"`).
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Begin => "begin",
            EventKind::Update => "update",
            EventKind::End => "end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single decoded pointer event.
///
/// Produced by the decoder on the message-pump thread and consumed exactly
/// once by the update dispatcher.  The record is `Copy` and never mutated
/// after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEventRecord {
    pub kind: EventKind,
    /// Normalised horizontal position, 0.0 = left edge of the client area.
    pub x: f64,
    /// Normalised vertical position, 0.0 = bottom edge of the client area.
    pub y: f64,
    /// Raw pen pressure as reported by the digitizer (0..=1024 on most pens).
    pub pressure: u32,
    /// Pen tilt along the X axis in degrees (-90..=90).
    pub tilt_x: i32,
    /// Pen tilt along the Y axis in degrees (-90..=90).
    pub tilt_y: i32,
    /// Clockwise pen rotation in degrees (0..=359).
    pub rotation: u32,
}

impl PointerEventRecord {
    /// Builds a record with only a position and pressure; tilt and rotation are zero.
    pub fn new(kind: EventKind, x: f64, y: f64, pressure: u32) -> Self {
        Self {
            kind,
            x,
            y,
            pressure,
            tilt_x: 0,
            tilt_y: 0,
            rotation: 0,
        }
    }
}
