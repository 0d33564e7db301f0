//! Mock window host for unit and integration testing.
//!
//! Stands in for a real window: tests configure the client rectangle and the
//! pen info per pointer id, then [`send`](MockWindowHost::send) messages as
//! if Windows delivered them.  Messages reach the installed interceptor, or
//! the host's original procedure when nothing is installed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use wm_pointer_core::{ClientRect, PenInfo};

use crate::application::intercept_messages::{MessageHandler, WindowMessage, WindowSystem};
use crate::application::provider::{HookError, InterceptorBuilder, MessageHook};

#[derive(Default)]
struct HostState {
    client_rect: Option<ClientRect>,
    pens: HashMap<u32, PenInfo>,
    installed: Option<Arc<dyn MessageHandler>>,
    forwarded: Vec<WindowMessage>,
    original_result: isize,
}

/// A cloneable handle to one fake window.
///
/// Every clone shares the same state, so a test can hand one clone to a
/// provider and keep another to drive and inspect the window.
#[derive(Clone, Default)]
pub struct MockWindowHost {
    state: Arc<Mutex<HostState>>,
}

impl MockWindowHost {
    /// Creates a window with no client area and no known pointers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_client_rect(&self, rect: Option<ClientRect>) {
        self.lock().client_rect = rect;
    }

    /// Makes `GetPointerPenInfo` succeed for `pointer_id`.
    pub fn set_pen_info(&self, pointer_id: u32, pen: PenInfo) {
        self.lock().pens.insert(pointer_id, pen);
    }

    /// Makes `GetPointerPenInfo` fail for `pointer_id`.
    pub fn remove_pen_info(&self, pointer_id: u32) {
        self.lock().pens.remove(&pointer_id);
    }

    /// Value the original window procedure returns.
    pub fn set_original_result(&self, result: isize) {
        self.lock().original_result = result;
    }

    /// Delivers `message` to the window and returns the procedure's result.
    pub fn send(&self, message: WindowMessage) -> isize {
        // Clone the handler out so the lock is free while it runs; the
        // original procedure below needs it again.
        let installed = self.lock().installed.clone();
        match installed {
            Some(handler) => handler.handle(message),
            None => self.original_procedure(message),
        }
    }

    /// Messages that reached the original window procedure, oldest first.
    pub fn forwarded(&self) -> Vec<WindowMessage> {
        self.lock().forwarded.clone()
    }

    pub fn is_installed(&self) -> bool {
        self.lock().installed.is_some()
    }

    fn original_procedure(&self, message: WindowMessage) -> isize {
        let mut state = self.lock();
        state.forwarded.push(message);
        state.original_result
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The window's original procedure, as seen by an installed interceptor.
struct OriginalProcedure {
    host: MockWindowHost,
}

impl MessageHandler for OriginalProcedure {
    fn handle(&self, message: WindowMessage) -> isize {
        self.host.original_procedure(message)
    }
}

/// Pointer queries answered from the host's configured state.
struct MockWindow {
    host: MockWindowHost,
}

impl WindowSystem for MockWindow {
    fn client_rect(&self) -> Option<ClientRect> {
        self.host.lock().client_rect
    }

    fn pen_info(&self, pointer_id: u32) -> Option<PenInfo> {
        self.host.lock().pens.get(&pointer_id).copied()
    }
}

impl MessageHook for MockWindowHost {
    fn window_system(&self) -> Result<Arc<dyn WindowSystem>, HookError> {
        Ok(Arc::new(MockWindow { host: self.clone() }))
    }

    fn install(&mut self, build: InterceptorBuilder) -> Result<(), HookError> {
        if self.is_installed() {
            return Err(HookError::AlreadyInstalled);
        }
        let next = Box::new(OriginalProcedure { host: self.clone() });
        let handler = build(next);
        self.lock().installed = Some(handler);
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), HookError> {
        match self.lock().installed.take() {
            Some(_) => Ok(()),
            None => Err(HookError::NotInstalled),
        }
    }
}
