//! # wm-pointer-core
//!
//! Shared library for the WM_POINTER input provider containing the pointer
//! message decoder, the event record types, and the queue that hands decoded
//! events from the window's message pump to the host's poll loop.
//!
//! It has zero dependencies on OS APIs.  Everything here can be compiled and
//! tested on any platform; the Windows-specific glue lives in the
//! `wm-pointer` crate.
//!
//! # Architecture overview (for beginners)
//!
//! Windows reports pen, touch and (optionally) mouse contacts to a window as
//! `WM_POINTER*` messages.  Each message carries a pointer id in `wParam` and
//! the contact's screen position packed into `lParam`.  The provider turns
//! these messages into a small stream of lifecycle events:
//!
//! ```text
//! WM_POINTERENTER / WM_POINTERDOWN  ──►  begin
//! WM_POINTERUPDATE                  ──►  update
//! WM_POINTERUP    / WM_POINTERLEAVE ──►  end
//! ```
//!
//! - **`message`** – Message codes and the decoder that unpacks `wParam` /
//!   `lParam` and normalises the position against the window's client area.
//!
//! - **`domain`** – The immutable [`PointerEventRecord`], the window
//!   [`ClientRect`], and the [`TrackedPointer`] handed to the host.
//!
//! - **`queue`** – The thread-safe [`EventQueue`] shared by producer and
//!   consumer.

pub mod domain;
pub mod message;
pub mod queue;

pub use domain::event::{EventKind, PointerEventRecord};
pub use domain::geometry::{ClientRect, DecodeError};
pub use domain::pointer::{PointerUid, TrackedPointer};
pub use message::codes::PointerMessage;
pub use message::decode::{decode_pointer_message, PenInfo};
pub use queue::EventQueue;
