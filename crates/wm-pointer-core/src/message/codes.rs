//! `WM_POINTER*` message numbers and parameter unpacking.
//!
//! The values are copied from `WinUser.h` so that this crate can classify
//! messages without linking against the Windows API.

use crate::domain::event::EventKind;

pub const WM_POINTERUPDATE: u32 = 0x0245;
pub const WM_POINTERDOWN: u32 = 0x0246;
pub const WM_POINTERUP: u32 = 0x0247;
pub const WM_POINTERENTER: u32 = 0x0249;
pub const WM_POINTERLEAVE: u32 = 0x024A;

/// Sent by the tablet subsystem to ask which system gestures a window wants.
pub const WM_TABLET_QUERYSYSTEMGESTURE: u32 = 0x02CC;

pub const TABLET_DISABLE_PRESSANDHOLD: isize = 0x0000_0001;
pub const TABLET_DISABLE_PENTAPFEEDBACK: isize = 0x0000_0008;
pub const TABLET_DISABLE_PENBARRELFEEDBACK: isize = 0x0000_0010;
pub const TABLET_DISABLE_SMOOTHSCROLLING: isize = 0x0008_0000;
pub const TABLET_DISABLE_FLICKFALLBACKKEYS: isize = 0x0010_0000;
pub const TABLET_ENABLE_MULTITOUCHDATA: isize = 0x0100_0000;

/// Reply to `WM_TABLET_QUERYSYSTEMGESTURE` that turns off the gestures which
/// would otherwise swallow or delay pen input.
pub const QUERYSYSTEMGESTURE_REPLY: isize = TABLET_DISABLE_PRESSANDHOLD
    | TABLET_DISABLE_PENTAPFEEDBACK
    | TABLET_DISABLE_PENBARRELFEEDBACK
    | TABLET_DISABLE_SMOOTHSCROLLING
    | TABLET_DISABLE_FLICKFALLBACKKEYS
    | TABLET_ENABLE_MULTITOUCHDATA;

/// One of the five pointer lifecycle messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMessage {
    Enter,
    Down,
    Update,
    Up,
    Leave,
}

impl PointerMessage {
    /// Classifies a raw message number; `None` for anything that is not a
    /// pointer lifecycle message.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            WM_POINTERENTER => Some(PointerMessage::Enter),
            WM_POINTERDOWN => Some(PointerMessage::Down),
            WM_POINTERUPDATE => Some(PointerMessage::Update),
            WM_POINTERUP => Some(PointerMessage::Up),
            WM_POINTERLEAVE => Some(PointerMessage::Leave),
            _ => None,
        }
    }

    /// The lifecycle event this message produces.
    pub fn event_kind(self) -> EventKind {
        match self {
            PointerMessage::Enter | PointerMessage::Down => EventKind::Begin,
            PointerMessage::Update => EventKind::Update,
            PointerMessage::Up | PointerMessage::Leave => EventKind::End,
        }
    }
}

/// `GET_POINTERID_WPARAM`: the pointer id lives in the low word of `wParam`.
pub fn pointer_id_from_wparam(wparam: usize) -> u32 {
    (wparam & 0xFFFF) as u32
}

/// `GET_X_LPARAM` / `GET_Y_LPARAM`: signed 16-bit screen coordinates packed
/// into the low and high words of `lParam`.
///
/// The words are sign-extended, so positions on monitors left of or above
/// the primary one come out negative.
pub fn unpack_lparam(lparam: isize) -> (i32, i32) {
    let x = (lparam & 0xFFFF) as u16 as i16;
    let y = ((lparam >> 16) & 0xFFFF) as u16 as i16;
    (i32::from(x), i32::from(y))
}

/// Packs screen coordinates the way Windows does (`MAKELPARAM`).
pub fn pack_lparam(x: i32, y: i32) -> isize {
    let lo = (x as u16) as u32;
    let hi = (y as u16) as u32;
    ((hi << 16) | lo) as i32 as isize
}
