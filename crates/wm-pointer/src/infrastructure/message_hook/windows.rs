//! Win32 window-subclassing hook.
//!
//! Replaces a window's `GWLP_WNDPROC` with [`pointer_wnd_proc`], which looks
//! up the installed [`MessageHandler`] and hands it every message.  The
//! window's original procedure becomes the handler's `next` link and is
//! invoked through `CallWindowProcW`.
//!
//! Also provides [`HostWindow`], a plain top-level window with its own
//! message-loop thread, used by the binary to have something to attach to.
//!
//! # Re-entrancy
//!
//! Window procedures are re-entrant: the original procedure may `SendMessage`
//! to its own window, which calls straight back into `pointer_wnd_proc` on
//! the same thread.  The installed handler is therefore kept in an
//! `RwLock<Option<Arc<…>>>` and cloned out before it runs, so no lock is held
//! while a message is being handled.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::ffi::c_void;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::Pointer::{
    EnableMouseInPointer, GetPointerPenInfo, POINTER_PEN_INFO,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CallWindowProcW, CreateWindowExW, DefWindowProcW, DispatchMessageW, GetActiveWindow,
    GetClientRect, GetMessageW, PostMessageW, PostQuitMessage, RegisterClassW,
    TranslateMessage, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, GWLP_WNDPROC, MSG, WM_CLOSE,
    WM_DESTROY, WINDOW_EX_STYLE, WNDCLASSW, WNDPROC, WS_OVERLAPPEDWINDOW, WS_VISIBLE,
};
use wm_pointer_core::{ClientRect, PenInfo};

use crate::application::intercept_messages::{MessageHandler, WindowMessage, WindowSystem};
use crate::application::provider::{HookError, InterceptorBuilder, MessageHook};

/// The handler `pointer_wnd_proc` delegates to.  One per process.
static INSTALLED: RwLock<Option<Arc<dyn MessageHandler>>> = RwLock::new(None);

/// The hooked window's original `WNDPROC`, stored as an integer.  0 until the
/// first install.
static ORIGINAL_PROC: AtomicIsize = AtomicIsize::new(0);

/// Subclassing hook for one Win32 window.
///
/// Only one hook may be installed per process; a second `install` fails with
/// [`HookError::AlreadyInstalled`].
pub struct Win32MessageHook {
    /// `HWND` stored as an integer so the hook is `Send`.
    hwnd: isize,
    enable_mouse_in_pointer: bool,
    installed: bool,
}

impl Win32MessageHook {
    /// Hooks an explicit window handle.
    pub fn for_window(hwnd: HWND, enable_mouse_in_pointer: bool) -> Self {
        Self::for_raw_handle(hwnd.0 as isize, enable_mouse_in_pointer)
    }

    /// Hooks a window handle passed around as an integer, for factories that
    /// must be `Send + Sync`.
    pub fn for_raw_handle(hwnd: isize, enable_mouse_in_pointer: bool) -> Self {
        Self {
            hwnd,
            enable_mouse_in_pointer,
            installed: false,
        }
    }

    /// Hooks the calling thread's active window.
    ///
    /// # Errors
    ///
    /// [`HookError::NoActiveWindow`] if the thread has no active window.
    pub fn active_window(enable_mouse_in_pointer: bool) -> Result<Self, HookError> {
        // SAFETY: GetActiveWindow has no preconditions.
        let hwnd = unsafe { GetActiveWindow() };
        if hwnd.is_invalid() {
            return Err(HookError::NoActiveWindow);
        }
        Ok(Self::for_window(hwnd, enable_mouse_in_pointer))
    }

    fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut c_void)
    }
}

impl MessageHook for Win32MessageHook {
    fn window_system(&self) -> Result<Arc<dyn WindowSystem>, HookError> {
        Ok(Arc::new(Win32Window { hwnd: self.hwnd }))
    }

    fn install(&mut self, build: InterceptorBuilder) -> Result<(), HookError> {
        let mut slot = INSTALLED.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(HookError::AlreadyInstalled);
        }

        if self.enable_mouse_in_pointer {
            // SAFETY: EnableMouseInPointer has no pointer arguments.  It fails
            // if mouse-in-pointer mode was already set for this process, which
            // is harmless.
            if let Err(e) = unsafe { EnableMouseInPointer(true) } {
                warn!("EnableMouseInPointer failed: {e}");
            }
        }

        // Record the original procedure before the hooked one can run, so
        // chaining never sees an empty ORIGINAL_PROC.
        // SAFETY: reading GWLP_WNDPROC of a window in this process.
        let original = unsafe { window_proc(self.hwnd()) };
        if original == 0 {
            return Err(HookError::Platform(format!(
                "GetWindowLongPtrW(GWLP_WNDPROC) failed for window {:#x}",
                self.hwnd
            )));
        }
        ORIGINAL_PROC.store(original, Ordering::SeqCst);

        let handler = build(Box::new(OriginalProcedure { hwnd: self.hwnd }));
        *slot = Some(handler);

        // SAFETY: `pointer_wnd_proc` has the WNDPROC signature and lives for
        // the whole program.  The window belongs to this process.
        let previous = unsafe { set_window_proc(self.hwnd(), pointer_wnd_proc as usize as isize) };
        if previous == 0 {
            *slot = None;
            return Err(HookError::Platform(format!(
                "SetWindowLongPtrW(GWLP_WNDPROC) failed for window {:#x}",
                self.hwnd
            )));
        }
        if previous != original {
            // Another thread swapped the procedure in between; chain to that.
            ORIGINAL_PROC.store(previous, Ordering::SeqCst);
        }
        self.installed = true;

        info!(hwnd = self.hwnd, "window procedure hooked");
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), HookError> {
        if !self.installed {
            return Err(HookError::NotInstalled);
        }

        let original = ORIGINAL_PROC.load(Ordering::SeqCst);
        // SAFETY: `original` is the procedure the window had when the hook
        // was installed on this same window.
        let replaced = unsafe { set_window_proc(self.hwnd(), original) };
        // ORIGINAL_PROC stays set: a message already inside pointer_wnd_proc
        // may still chain to it.
        *INSTALLED.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.installed = false;

        if replaced == 0 {
            // The window is most likely destroyed; nothing is left to restore.
            return Err(HookError::Platform(format!(
                "failed to restore the window procedure of window {:#x}",
                self.hwnd
            )));
        }

        info!(hwnd = self.hwnd, "window procedure restored");
        Ok(())
    }
}

/// Pointer queries against one window.
struct Win32Window {
    hwnd: isize,
}

impl WindowSystem for Win32Window {
    fn client_rect(&self) -> Option<ClientRect> {
        let hwnd = HWND(self.hwnd as *mut c_void);
        let mut rect = RECT::default();
        // SAFETY: `rect` is a valid, writable RECT.
        unsafe { GetClientRect(hwnd, &mut rect) }.ok()?;

        // Client coordinates start at (0, 0); pointer messages use screen
        // coordinates, so translate the origin.
        let mut origin = POINT {
            x: rect.left,
            y: rect.top,
        };
        // SAFETY: `origin` is a valid, writable POINT.
        if !unsafe { ClientToScreen(hwnd, &mut origin) }.as_bool() {
            return None;
        }

        Some(ClientRect {
            left: origin.x,
            top: origin.y,
            width: (rect.right - rect.left).max(0) as u32,
            height: (rect.bottom - rect.top).max(0) as u32,
        })
    }

    fn pen_info(&self, pointer_id: u32) -> Option<PenInfo> {
        let mut info = POINTER_PEN_INFO::default();
        // SAFETY: `info` is a valid, writable POINTER_PEN_INFO.  The call
        // fails for non-pen pointers and for ids no longer being tracked.
        unsafe { GetPointerPenInfo(pointer_id, &mut info) }.ok()?;

        Some(PenInfo {
            pressure: info.pressure,
            rotation: info.rotation,
            tilt_x: info.tiltX,
            tilt_y: info.tiltY,
        })
    }
}

/// The hooked window's original procedure, as the interceptor's next link.
struct OriginalProcedure {
    hwnd: isize,
}

impl MessageHandler for OriginalProcedure {
    fn handle(&self, message: WindowMessage) -> isize {
        call_original(HWND(self.hwnd as *mut c_void), message)
    }
}

fn call_original(hwnd: HWND, message: WindowMessage) -> isize {
    let original = ORIGINAL_PROC.load(Ordering::SeqCst);
    let wparam = WPARAM(message.wparam);
    let lparam = LPARAM(message.lparam);

    // SAFETY: a non-zero `original` is the WNDPROC previously installed on
    // this window; transmuting it back restores the function pointer.  With
    // no original recorded yet, fall back to the default procedure.
    unsafe {
        if original == 0 {
            DefWindowProcW(hwnd, message.code, wparam, lparam).0
        } else {
            let proc: WNDPROC = std::mem::transmute::<isize, WNDPROC>(original);
            CallWindowProcW(proc, hwnd, message.code, wparam, lparam).0
        }
    }
}

/// Replacement window procedure.
///
/// # Safety
///
/// Called by Windows on the hooked window's thread.  Must not panic.
unsafe extern "system" fn pointer_wnd_proc(
    hwnd: HWND,
    msg: u32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    let message = WindowMessage::new(msg, w_param.0, l_param.0);
    let handler = INSTALLED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();

    match handler {
        Some(handler) => LRESULT(handler.handle(message)),
        None => LRESULT(call_original(hwnd, message)),
    }
}

#[cfg(target_pointer_width = "64")]
unsafe fn window_proc(hwnd: HWND) -> isize {
    windows::Win32::UI::WindowsAndMessaging::GetWindowLongPtrW(hwnd, GWLP_WNDPROC)
}

#[cfg(target_pointer_width = "32")]
unsafe fn window_proc(hwnd: HWND) -> isize {
    windows::Win32::UI::WindowsAndMessaging::GetWindowLongW(hwnd, GWLP_WNDPROC) as isize
}

#[cfg(target_pointer_width = "64")]
unsafe fn set_window_proc(hwnd: HWND, proc: isize) -> isize {
    windows::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW(hwnd, GWLP_WNDPROC, proc)
}

#[cfg(target_pointer_width = "32")]
unsafe fn set_window_proc(hwnd: HWND, proc: isize) -> isize {
    windows::Win32::UI::WindowsAndMessaging::SetWindowLongW(hwnd, GWLP_WNDPROC, proc as i32)
        as isize
}

// ── Host window ───────────────────────────────────────────────────────────────

/// A visible top-level window running its own message loop thread.
pub struct HostWindow {
    hwnd: isize,
    thread: Option<JoinHandle<()>>,
}

impl HostWindow {
    /// Creates the window on a dedicated thread and waits until it exists.
    ///
    /// # Errors
    ///
    /// [`HookError::Platform`] if the thread, class, or window cannot be created.
    pub fn spawn(title: &str, width: i32, height: i32) -> Result<Self, HookError> {
        let title: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<isize, String>>();

        let thread = thread::Builder::new()
            .name("wm-pointer-window".to_string())
            .spawn(move || run_window_loop(title, width, height, ready_tx))
            .map_err(|e| HookError::Platform(e.to_string()))?;

        let hwnd = ready_rx
            .recv()
            .map_err(|e| HookError::Platform(e.to_string()))?
            .map_err(HookError::Platform)?;

        debug!(hwnd, "host window created");
        Ok(Self {
            hwnd,
            thread: Some(thread),
        })
    }

    pub fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut c_void)
    }

    pub fn raw_handle(&self) -> isize {
        self.hwnd
    }

    /// Closes the window and joins its message loop thread.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(thread) = self.thread.take() {
            // SAFETY: posting to a window handle that may already be
            // destroyed simply fails.
            let posted =
                unsafe { PostMessageW(Some(self.hwnd()), WM_CLOSE, WPARAM(0), LPARAM(0)) };
            if let Err(e) = posted {
                warn!("failed to post WM_CLOSE: {e}");
            }
            if thread.join().is_err() {
                warn!("host window thread panicked");
            }
        }
    }
}

impl Drop for HostWindow {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_window_loop(
    title: Vec<u16>,
    width: i32,
    height: i32,
    ready: mpsc::Sender<Result<isize, String>>,
) {
    // SAFETY: standard Win32 class registration, window creation, and
    // GetMessage/DispatchMessage loop on the thread that owns the window.
    // `title` outlives the CreateWindowExW call.
    unsafe {
        let instance = match GetModuleHandleW(None) {
            Ok(instance) => instance,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };

        let class_name = w!("WmPointerHostWindow");
        let class = WNDCLASSW {
            hInstance: instance.into(),
            lpszClassName: class_name,
            lpfnWndProc: Some(host_wnd_proc),
            style: CS_HREDRAW | CS_VREDRAW,
            ..Default::default()
        };
        if RegisterClassW(&class) == 0 {
            let _ = ready.send(Err("RegisterClassW failed".to_string()));
            return;
        }

        let hwnd = match CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class_name,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW | WS_VISIBLE,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            width,
            height,
            None,
            None,
            Some(instance.into()),
            None,
        ) {
            Ok(hwnd) => hwnd,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        let _ = ready.send(Ok(hwnd.0 as isize));

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

unsafe extern "system" fn host_wnd_proc(
    hwnd: HWND,
    msg: u32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    match msg {
        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, w_param, l_param),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
