//! Infrastructure layer of the pointer provider.
//!
//! Contains OS-facing adapters: the window-procedure hooks (Win32 and an
//! in-process mock) and file-system storage for the TOML configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `wm_pointer_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.

pub mod message_hook;
pub mod storage;
