//! View state and the reconciliation of call outcomes onto it.
//!
//! A controller owns one [`ViewState`] and one [`CallTracker`]. Starting a call goes
//! through [`CallTracker::issue`] and [`ViewState::begin`]; when the call's single
//! terminal outcome arrives, [`CallTracker::resolve`] decides whether it still counts
//! and the state is updated with [`ViewState::succeed`] or [`ViewState::fail`].

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Where the last call left the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// What happens to `items` when a call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    KeepItems,
    ClearItems,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            phase: Phase::Idle,
        }
    }
}

impl<T> ViewState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.phase = Phase::Loading;
    }

    /// Applies a successful outcome. `items` is replaced wholesale when given.
    pub fn succeed(&mut self, items: Option<Vec<T>>, still_loading: bool) {
        if let Some(items) = items {
            self.items = items;
        }
        self.settle(Phase::Success, still_loading);
    }

    pub fn fail(&mut self, message: impl Into<String>, on_failure: OnFailure, still_loading: bool) {
        self.error = Some(message.into());
        if on_failure == OnFailure::ClearItems {
            self.items.clear();
        }
        self.settle(Phase::Failed, still_loading);
    }

    /// The phase stays `Loading` while another call is still outstanding.
    fn settle(&mut self, phase: Phase, still_loading: bool) {
        self.loading = still_loading;
        self.phase = if still_loading { Phase::Loading } else { phase };
    }
}

/// Verdict on an arriving outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Reconcile it. `still_loading` is what `loading` must read afterwards.
    Apply { still_loading: bool },
    /// A newer call of the same kind was issued after this one. Drop it.
    Stale,
}

/// Hands out sequence numbers to calls and judges their outcomes.
///
/// With `discard_stale` set, only the most recently issued call of each kind may
/// touch state, and `loading` stays up while any kind still has its latest call
/// outstanding. Without it every outcome is applied in arrival order and clears
/// `loading`, so the last arrival wins.
#[derive(Debug)]
pub struct CallTracker<K> {
    discard_stale: bool,
    next_seq: u64,
    latest: HashMap<K, u64>,
    pending: HashSet<K>,
}

impl<K: Copy + Eq + Hash> CallTracker<K> {
    pub fn new(discard_stale: bool) -> Self {
        Self {
            discard_stale,
            next_seq: 1,
            latest: HashMap::new(),
            pending: HashSet::new(),
        }
    }

    pub fn issue(&mut self, kind: K) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest.insert(kind, seq);
        self.pending.insert(kind);
        seq
    }

    pub fn resolve(&mut self, kind: K, seq: u64) -> Resolution {
        let is_latest = self.latest.get(&kind) == Some(&seq);

        if !self.discard_stale {
            if is_latest {
                self.pending.remove(&kind);
            }
            return Resolution::Apply { still_loading: false };
        }

        if !is_latest {
            return Resolution::Stale;
        }
        self.pending.remove(&kind);
        Resolution::Apply {
            still_loading: !self.pending.is_empty(),
        }
    }

    pub fn is_pending(&self, kind: K) -> bool {
        self.pending.contains(&kind)
    }
}
