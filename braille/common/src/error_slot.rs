use std::sync::{Mutex, MutexGuard};

/// Last-error slot read with take semantics.
///
/// Shared by every caller: a failure on one thread can overwrite, or be read by,
/// another. Only the host exports use this; the translator itself returns `Result`.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    message: Mutex<Option<String>>,
}

impl ErrorSlot {
    pub const fn new() -> Self {
        Self {
            message: Mutex::new(None),
        }
    }

    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        *self.lock() = if message.is_empty() {
            None
        } else {
            Some(message)
        };
    }

    /// Return the stored message and clear the slot.
    pub fn take(&self) -> Option<String> {
        self.lock().take()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.message.lock().unwrap_or_else(|e| e.into_inner())
    }
}
