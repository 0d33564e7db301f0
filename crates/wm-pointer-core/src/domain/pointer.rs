//! The tracked pointer handed to the host's dispatch callback.

use std::fmt;
use std::time::Instant;

use super::event::PointerEventRecord;

/// Unique identifier of a tracked pointer.
///
/// Issued by the update dispatcher; every `begin` receives a value strictly
/// greater than all previously issued ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointerUid(pub u64);

impl fmt::Display for PointerUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-memory representation of one contact's lifecycle.
///
/// Created on `begin`, moved on `update`, finished on `end`.  Positions are
/// normalised (see [`ClientRect::normalize`](crate::ClientRect::normalize)).
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPointer {
    uid: PointerUid,
    device: String,
    x: f64,
    y: f64,
    previous_x: f64,
    previous_y: f64,
    pressure: u32,
    tilt_x: i32,
    tilt_y: i32,
    rotation: u32,
    time_start: Instant,
    time_update: Instant,
    time_end: Option<Instant>,
}

impl TrackedPointer {
    /// Starts tracking a new contact from a `begin` record.
    pub fn begin(
        uid: PointerUid,
        device: impl Into<String>,
        record: &PointerEventRecord,
        now: Instant,
    ) -> Self {
        Self {
            uid,
            device: device.into(),
            x: record.x,
            y: record.y,
            previous_x: record.x,
            previous_y: record.y,
            pressure: record.pressure,
            tilt_x: record.tilt_x,
            tilt_y: record.tilt_y,
            rotation: record.rotation,
            time_start: now,
            time_update: now,
            time_end: None,
        }
    }

    /// Applies an `update` record in place, keeping the prior position.
    pub fn move_to(&mut self, record: &PointerEventRecord, now: Instant) {
        self.previous_x = self.x;
        self.previous_y = self.y;
        self.x = record.x;
        self.y = record.y;
        self.pressure = record.pressure;
        self.tilt_x = record.tilt_x;
        self.tilt_y = record.tilt_y;
        self.rotation = record.rotation;
        self.time_update = now;
    }

    /// Stamps the end-of-life time.
    pub fn finish(&mut self, now: Instant) {
        self.time_update = now;
        self.time_end = Some(now);
    }

    pub fn uid(&self) -> PointerUid {
        self.uid
    }

    /// Name of the provider instance that produced this pointer.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Current normalised position.
    pub fn pos(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Position before the most recent update.
    pub fn previous_pos(&self) -> (f64, f64) {
        (self.previous_x, self.previous_y)
    }

    /// Movement since the previous update.
    pub fn delta(&self) -> (f64, f64) {
        (self.x - self.previous_x, self.y - self.previous_y)
    }

    pub fn pressure(&self) -> u32 {
        self.pressure
    }

    pub fn tilt(&self) -> (i32, i32) {
        (self.tilt_x, self.tilt_y)
    }

    pub fn rotation(&self) -> u32 {
        self.rotation
    }

    pub fn time_start(&self) -> Instant {
        self.time_start
    }

    pub fn time_update(&self) -> Instant {
        self.time_update
    }

    pub fn time_end(&self) -> Option<Instant> {
        self.time_end
    }

    /// `true` until [`finish`](Self::finish) has been called.
    pub fn is_active(&self) -> bool {
        self.time_end.is_none()
    }
}

impl fmt::Display for TrackedPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<WMPointer uid:{} pos:({:.4}, {:.4}) device:{} pressure:{}>",
            self.uid, self.x, self.y, self.device, self.pressure
        )
    }
}
