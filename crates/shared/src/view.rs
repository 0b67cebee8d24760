//! Per-view load state
//!
//! Each view owns a [`Mounted`] flag and hands a [`MountToken`] to the async
//! load it starts. Nothing cancels the request itself; when it completes, the
//! result is applied only if the view is still mounted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::outcome::FetchOutcome;

/// Lifetime flag owned by a view. Dropping it unmounts the view.
#[derive(Debug)]
pub struct Mounted {
    flag: Arc<AtomicBool>,
}

impl Default for Mounted {
    fn default() -> Self {
        Self::new()
    }
}

impl Mounted {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn token(&self) -> MountToken {
        MountToken {
            flag: Arc::clone(&self.flag),
        }
    }

    pub fn unmount(&self) {
        self.flag.store(false, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Handle carried by an in-flight load
#[derive(Debug, Clone)]
pub struct MountToken {
    flag: Arc<AtomicBool>,
}

impl MountToken {
    pub fn is_mounted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Run `update` only while the owning view is mounted.
    /// Returns whether it ran.
    pub fn apply(&self, update: impl FnOnce()) -> bool {
        if !self.is_mounted() {
            tracing::debug!("View unmounted before load finished; dropping result");
            return false;
        }
        update();
        true
    }
}

/// What a view's list load reports back
#[derive(Debug)]
pub enum LoadEvent<T> {
    Started,
    Finished(FetchOutcome<T>),
}

/// Where a view's list load currently stands
#[derive(Debug)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(FetchOutcome<T>),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn apply(&mut self, event: LoadEvent<T>) {
        *self = match event {
            LoadEvent::Started => LoadState::Loading,
            LoadEvent::Finished(outcome) => LoadState::Ready(outcome),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn outcome(&self) -> Option<&FetchOutcome<T>> {
        match self {
            LoadState::Ready(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn items(&self) -> &[T] {
        self.outcome().map(FetchOutcome::items).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_follows_view() {
        let view = Mounted::new();
        let token = view.token();
        assert!(token.is_mounted());

        view.unmount();
        assert!(!token.is_mounted());
        assert!(!view.is_mounted());
    }

    #[test]
    fn test_drop_unmounts() {
        let token = {
            let view = Mounted::new();
            view.token()
        };
        assert!(!token.is_mounted());
    }

    #[test]
    fn test_apply_skips_after_unmount() {
        let view = Mounted::new();
        let token = view.token();
        let mut hits = 0;

        assert!(token.apply(|| hits += 1));
        view.unmount();
        assert!(!token.apply(|| hits += 1));
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_load_state_items() {
        let mut state: LoadState<u8> = LoadState::default();
        assert!(state.items().is_empty());
        assert!(state.outcome().is_none());

        state = LoadState::Loading;
        assert!(state.is_loading());

        state = LoadState::Ready(FetchOutcome::Loaded(vec![3, 4]));
        assert_eq!(state.items(), &[3, 4]);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_load_state_follows_events() {
        let mut state: LoadState<u8> = LoadState::Idle;
        state.apply(LoadEvent::Started);
        assert!(state.is_loading());

        state.apply(LoadEvent::Finished(FetchOutcome::Empty));
        assert!(matches!(state.outcome(), Some(FetchOutcome::Empty)));

        state.apply(LoadEvent::Started);
        assert!(state.outcome().is_none());
    }
}
