//! Message-hook infrastructure.
//!
//! On Windows, [`windows::Win32MessageHook`] subclasses a window by swapping
//! its `GWLP_WNDPROC` and answers pointer queries with `GetClientRect` /
//! `GetPointerPenInfo`.  The interceptor then runs on the window's own
//! message-pump thread.
//!
//! # Testability
//!
//! [`mock::MockWindowHost`] implements the same
//! [`MessageHook`](crate::application::provider::MessageHook) trait without
//! any OS window, so provider lifecycle tests run on every platform.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
