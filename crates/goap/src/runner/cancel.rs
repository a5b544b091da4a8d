//! Cross-thread cancellation flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable flag that stops a runner at its next tick.
///
/// Every clone shares the same flag, so a token handed to another thread can
/// stop the episode without access to the runner itself.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Re-arms the token for a new episode.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let remote = token.clone();

        std::thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(token.is_cancelled());

        token.clear();
        assert!(!token.is_cancelled());
    }
}
