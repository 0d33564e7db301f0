//! Windows pointer message vocabulary and decoding.
//!
//! - [`codes`] – the `WM_POINTER*` message numbers and `wParam`/`lParam`
//!   unpacking helpers.
//! - [`decode`] – turns one message plus the window's client rectangle and
//!   pen info into a [`PointerEventRecord`](crate::PointerEventRecord).

pub mod codes;
pub mod decode;
