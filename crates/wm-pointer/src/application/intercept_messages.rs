//! PointerInterceptor: the replacement window procedure.
//!
//! # Window-procedure chaining (for beginners)
//!
//! Every Win32 window has a *window procedure*: a function Windows calls for
//! each message sent to the window.  To observe pointer messages without
//! owning the window, the provider swaps in its own procedure and keeps the
//! previous one as the **next handler**:
//!
//! ```text
//! Windows ──► PointerInterceptor ──(WM_POINTER*)──► decode ──► EventQueue
//!                     │
//!                     └──(everything else)──► next handler (original proc)
//! ```
//!
//! The interceptor runs on the message-pump thread and must return quickly.
//! It performs two OS queries per pointer message (client rectangle and pen
//! info), does a few divisions, and pushes one record.  All further work is
//! deferred to the poll loop.
//!
//! # Lifecycle gating
//!
//! A small stroke state keeps the stream well-formed:
//!
//! | message    | Idle            | Entered             | Contact           |
//! |------------|-----------------|---------------------|-------------------|
//! | enter      | begin → Entered | begin → Entered     | begin → Entered   |
//! | down       | begin → Contact | consumed → Contact  | begin → Contact   |
//! | update     | consumed        | update              | update            |
//! | up / leave | consumed        | end → Idle          | end → Idle        |
//!
//! - down produces `begin` unless an enter already did, so hover-in followed
//!   by touch-down yields one `begin`, not two;
//! - update and up/leave need a stroke in progress.
//!
//! An enter outside `Idle`, or a down during `Contact`, means the previous
//! `end` was lost (its pen lookup failed, or the window had no client area
//! at the time).  It starts a new stroke and the dispatcher replaces the
//! stale pointer.

use std::sync::{Arc, Mutex, PoisonError};

#[cfg(test)]
use mockall::automock;
use tracing::{debug, trace, warn};
use wm_pointer_core::message::codes::{
    pointer_id_from_wparam, QUERYSYSTEMGESTURE_REPLY, WM_TABLET_QUERYSYSTEMGESTURE,
};
use wm_pointer_core::{
    decode_pointer_message, ClientRect, EventKind, EventQueue, PenInfo, PointerMessage,
};

/// Value returned to Windows for pointer messages the interceptor consumed.
pub const MESSAGE_HANDLED: isize = 0;

/// A raw window message as delivered to a window procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMessage {
    pub code: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl WindowMessage {
    pub fn new(code: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            code,
            wparam,
            lparam,
        }
    }
}

/// One link in a window-procedure chain.
///
/// Handlers are shared between the thread that installs them and the
/// window's message-pump thread, hence `Send + Sync` and `&self`.
pub trait MessageHandler: Send + Sync {
    /// Handles a message and returns the window-procedure result.
    fn handle(&self, message: WindowMessage) -> isize;
}

impl<F> MessageHandler for F
where
    F: Fn(WindowMessage) -> isize + Send + Sync,
{
    fn handle(&self, message: WindowMessage) -> isize {
        self(message)
    }
}

/// Per-window OS queries the interceptor needs to decode a pointer message.
///
/// The Win32 implementation calls `GetClientRect` and `GetPointerPenInfo`;
/// tests use the generated `MockWindowSystem` or the mock window host.
#[cfg_attr(test, automock)]
pub trait WindowSystem: Send + Sync {
    /// Current client area in screen coordinates, or `None` if unavailable.
    fn client_rect(&self) -> Option<ClientRect>;

    /// Pen state for `pointer_id`, or `None` if the query fails (the pointer
    /// is not a pen, or it has already been released).
    fn pen_info(&self, pointer_id: u32) -> Option<PenInfo>;
}

/// Behaviour switches for [`PointerInterceptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptorOptions {
    /// Answer `WM_TABLET_QUERYSYSTEMGESTURE` with the gesture-disable mask.
    pub disable_system_gestures: bool,
}

impl Default for InterceptorOptions {
    fn default() -> Self {
        Self {
            disable_system_gestures: true,
        }
    }
}

/// Where the interceptor is within a pen stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrokeState {
    Idle,
    /// `begin` was queued by an enter; the next down belongs to it.
    Entered,
    Contact,
}

/// Replacement window procedure that turns pointer messages into records.
pub struct PointerInterceptor {
    window: Arc<dyn WindowSystem>,
    queue: Arc<EventQueue>,
    options: InterceptorOptions,
    stroke: Mutex<StrokeState>,
    next: Box<dyn MessageHandler>,
}

impl PointerInterceptor {
    /// Creates an interceptor that forwards unrecognised messages to `next`.
    pub fn new(
        window: Arc<dyn WindowSystem>,
        queue: Arc<EventQueue>,
        options: InterceptorOptions,
        next: Box<dyn MessageHandler>,
    ) -> Self {
        Self {
            window,
            queue,
            options,
            stroke: Mutex::new(StrokeState::Idle),
            next,
        }
    }

    /// `true` between an enqueued `begin` and the matching `end`.
    pub fn is_pointer_active(&self) -> bool {
        self.stroke() != StrokeState::Idle
    }

    fn stroke(&self) -> StrokeState {
        *self.stroke.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_stroke(&self, state: StrokeState) {
        *self.stroke.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn intercept(&self, pointer_message: PointerMessage, message: WindowMessage) {
        use PointerMessage::{Down, Enter, Leave, Up, Update};

        let state = self.stroke();
        // State to move to once the record is queued.
        let next_state = match (pointer_message, state) {
            (Enter, _) => StrokeState::Entered,
            (Down, StrokeState::Entered) => {
                self.set_stroke(StrokeState::Contact);
                trace!("down after enter; begin already queued");
                return;
            }
            (Down, _) => StrokeState::Contact,
            (Update, StrokeState::Entered | StrokeState::Contact) => state,
            (Up | Leave, StrokeState::Entered | StrokeState::Contact) => StrokeState::Idle,
            (Update | Up | Leave, StrokeState::Idle) => {
                trace!(?pointer_message, ?state, "pointer message outside its stroke; consumed");
                return;
            }
        };
        let kind = pointer_message.event_kind();
        if kind == EventKind::Begin && state != StrokeState::Idle {
            debug!(?state, "begin during an unfinished stroke; starting a new one");
        }

        let pointer_id = pointer_id_from_wparam(message.wparam);

        let Some(rect) = self.window.client_rect() else {
            warn!(pointer_id, %kind, "client rectangle unavailable; dropping pointer message");
            return;
        };
        let Some(pen) = self.window.pen_info(pointer_id) else {
            debug!(pointer_id, %kind, "no pen info for pointer; skipping");
            return;
        };

        match decode_pointer_message(kind, message.lparam, &rect, &pen) {
            Ok(record) => {
                self.queue.push(record);
                self.set_stroke(next_state);
                debug!(
                    pointer_id,
                    %kind,
                    x = record.x,
                    y = record.y,
                    pressure = record.pressure,
                    "pointer event queued"
                );
            }
            Err(e) => warn!(pointer_id, %kind, "dropping pointer message: {e}"),
        }
    }
}

impl MessageHandler for PointerInterceptor {
    fn handle(&self, message: WindowMessage) -> isize {
        if message.code == WM_TABLET_QUERYSYSTEMGESTURE && self.options.disable_system_gestures {
            return QUERYSYSTEMGESTURE_REPLY;
        }

        match PointerMessage::from_code(message.code) {
            Some(pointer_message) => {
                self.intercept(pointer_message, message);
                MESSAGE_HANDLED
            }
            None => self.next.handle(message),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
