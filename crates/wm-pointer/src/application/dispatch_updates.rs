//! UpdateDispatcher: drives the tracked pointer from queued records.
//!
//! Called once per host poll.  Drains the [`EventQueue`] completely (oldest
//! record first) and applies each record to the single tracked pointer:
//!
//! ```text
//!          begin                    update
//!  Idle ──────────► Active ◄──────────────┐
//!   ▲                 │ └─────────────────┘
//!   └─────────────────┘
//!          end
//! ```
//!
//! Every applied transition invokes the host's dispatch callback with the
//! event kind and the tracked pointer.  Records that do not fit the current
//! state (`update` or `end` while idle) are logged and ignored; they never
//! reach the callback.

use std::time::Instant;

use tracing::{debug, warn};
use wm_pointer_core::{EventKind, EventQueue, PointerEventRecord, PointerUid, TrackedPointer};

/// Outcome of one [`UpdateDispatcher::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Records that produced a dispatch callback.
    pub dispatched: usize,
    /// Records dropped because no pointer was active.
    pub ignored: usize,
}

/// Owns the tracked pointer and the uid sequence.
pub struct UpdateDispatcher {
    device: String,
    last_uid: u64,
    pointer: Option<TrackedPointer>,
}

impl UpdateDispatcher {
    /// Creates an idle dispatcher whose pointers report `device` as their source.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            last_uid: 0,
            pointer: None,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// The pointer between its `begin` and `end`, if any.
    pub fn active_pointer(&self) -> Option<&TrackedPointer> {
        self.pointer.as_ref()
    }

    /// The most recently issued uid, or `None` before the first `begin`.
    pub fn last_uid(&self) -> Option<PointerUid> {
        (self.last_uid > 0).then_some(PointerUid(self.last_uid))
    }

    /// Drains `queue` and dispatches each resulting transition.
    ///
    /// Returns immediately when the queue is empty.  The queue lock is
    /// released before every callback, so producers are never blocked by a
    /// slow host.
    pub fn update<F>(&mut self, queue: &EventQueue, mut dispatch: F) -> DispatchSummary
    where
        F: FnMut(EventKind, &TrackedPointer),
    {
        let mut summary = DispatchSummary::default();
        while let Some(record) = queue.pop_oldest() {
            if self.apply(&record, &mut dispatch) {
                summary.dispatched += 1;
            } else {
                summary.ignored += 1;
            }
        }
        summary
    }

    /// Drops the tracked pointer without dispatching.  The uid sequence is
    /// kept, so uids stay unique across a stop/start cycle.
    pub fn reset(&mut self) -> Option<TrackedPointer> {
        self.pointer.take()
    }

    fn apply<F>(&mut self, record: &PointerEventRecord, dispatch: &mut F) -> bool
    where
        F: FnMut(EventKind, &TrackedPointer),
    {
        let now = Instant::now();
        match record.kind {
            EventKind::Begin => {
                if let Some(stale) = &self.pointer {
                    warn!(uid = %stale.uid(), "begin while a pointer is active; replacing it");
                }
                self.last_uid += 1;
                let uid = PointerUid(self.last_uid);
                let pointer = self
                    .pointer
                    .insert(TrackedPointer::begin(uid, self.device.as_str(), record, now));
                debug!(%uid, "pointer begin");
                dispatch(EventKind::Begin, pointer);
                true
            }
            EventKind::Update => match self.pointer.as_mut() {
                Some(pointer) => {
                    pointer.move_to(record, now);
                    dispatch(EventKind::Update, pointer);
                    true
                }
                None => {
                    warn!("update with no active pointer; ignoring");
                    false
                }
            },
            EventKind::End => match self.pointer.take() {
                Some(mut pointer) => {
                    pointer.finish(now);
                    debug!(uid = %pointer.uid(), "pointer end");
                    dispatch(EventKind::End, &pointer);
                    true
                }
                None => {
                    warn!("end with no active pointer; ignoring");
                    false
                }
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
