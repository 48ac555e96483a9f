//! Issue-order guard for overlapping reloads
//!
//! Every reload takes a token when it is requested. When its fetch
//! completes, the result may only be committed if no later token has been
//! issued since, so completion order never decides which data wins.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one reload request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReloadToken(u64);

impl ReloadToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct ReloadSequencer {
    latest: AtomicU64,
}

impl ReloadSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a token newer than every token issued before it
    pub fn issue(&self) -> ReloadToken {
        ReloadToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: ReloadToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Invalidate every outstanding token
    pub fn cancel_all(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
