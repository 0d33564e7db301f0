//! Application layer of the pointer provider.
//!
//! # What lives here? (for beginners)
//!
//! The application layer orchestrates the pure types from `wm_pointer_core`
//! and talks to the operating system only through traits.  Concrete Win32
//! calls live in `infrastructure`, which is why everything in this module can
//! be unit-tested on any platform.
//!
//! # Sub-modules
//!
//! - **`intercept_messages`** – The replacement window procedure.  Filters
//!   `WM_POINTER*` messages, decodes them into event records, and forwards
//!   every other message to the next handler in the chain.  Runs on the
//!   window's message-pump thread.
//!
//! - **`dispatch_updates`** – Drains the event queue once per poll and drives
//!   the tracked pointer through `begin → update* → end`, calling the host's
//!   dispatch callback for each transition.
//!
//! - **`provider`** – Ties the two together behind the `MotionEventProvider`
//!   lifecycle (`start`, `update`, `stop`) and defines the `MessageHook` seam
//!   that infrastructure implements.
//!
//! - **`registry`** – Name-keyed constructors so a host can create providers
//!   by name (`"wm_pointer"`).

pub mod dispatch_updates;
pub mod intercept_messages;
pub mod provider;
pub mod registry;
