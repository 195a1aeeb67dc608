//! Computed-once result caches shared by both engines.
//!
//! A battle is write-once-then-read-many: playability, the quick outcome and
//! the complete result are each computed at most once and never
//! invalidated. Filling the complete tier also fills the quick tier if it is
//! still empty, so asking for the quick outcome afterwards is free.

use std::cell::{Cell, OnceCell};

use crate::types::{BattleResult, Playability, ResultLevel};

/// Per-slot outcome codes plus the overall result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickOutcome {
    /// `-1` destroyed, `0` survived, positive = captured by that player.
    pub outcomes: Vec<i32>,
    /// Terminal flags.
    pub result: BattleResult,
}

/// A complete result can always be reduced to its quick outcome.
pub trait CompleteOutcome {
    /// Quick outcome implied by this complete result.
    fn quick_outcome(&self) -> QuickOutcome;
}

/// Lazily filled result tiers of one battle.
#[derive(Debug)]
pub struct BattleCache<C> {
    playability: OnceCell<Playability>,
    quick: OnceCell<QuickOutcome>,
    complete: OnceCell<C>,
    level: Cell<ResultLevel>,
}

impl<C> Default for BattleCache<C> {
    fn default() -> Self {
        Self {
            playability: OnceCell::new(),
            quick: OnceCell::new(),
            complete: OnceCell::new(),
            level: Cell::new(ResultLevel::empty()),
        }
    }
}

impl<C: CompleteOutcome> BattleCache<C> {
    /// Cached playability, computing it on first use.
    pub fn playability(&self, classify: impl FnOnce() -> Playability) -> Playability {
        *self.playability.get_or_init(classify)
    }

    /// Quick outcome, if computed.
    #[must_use]
    pub fn quick(&self) -> Option<&QuickOutcome> {
        self.quick.get()
    }

    /// Complete result, if computed.
    #[must_use]
    pub fn complete(&self) -> Option<&C> {
        self.complete.get()
    }

    /// Tiers satisfied so far.
    #[must_use]
    pub fn level(&self) -> ResultLevel {
        self.level.get()
    }

    /// Satisfy the requested tiers, running each computation at most once.
    ///
    /// Requesting the complete tier never runs `run_quick`: the quick
    /// outcome is taken from the complete result.
    pub fn prepare(
        &self,
        level: ResultLevel,
        run_quick: impl FnOnce() -> QuickOutcome,
        run_complete: impl FnOnce() -> C,
    ) {
        if level.contains(ResultLevel::COMPLETE_RESULT) && self.complete.get().is_none() {
            let complete = run_complete();
            self.quick.get_or_init(|| complete.quick_outcome());
            // Cannot already be set: checked above and nothing re-enters.
            let _ = self.complete.set(complete);
            self.level.set(
                self.level
                    .get()
                    .union(ResultLevel::COMPLETE_RESULT)
                    .union(ResultLevel::QUICK_OUTCOME),
            );
        } else if level.contains(ResultLevel::QUICK_OUTCOME) && self.quick.get().is_none() {
            self.quick.get_or_init(run_quick);
            self.level
                .set(self.level.get().union(ResultLevel::QUICK_OUTCOME));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Complete(i32);

    impl CompleteOutcome for Complete {
        fn quick_outcome(&self) -> QuickOutcome {
            QuickOutcome {
                outcomes: vec![self.0],
                result: BattleResult::TIMEOUT,
            }
        }
    }

    fn quick(value: i32) -> QuickOutcome {
        QuickOutcome {
            outcomes: vec![value],
            result: BattleResult::TIMEOUT,
        }
    }

    #[test]
    fn test_playability_computed_once() {
        let cache: BattleCache<Complete> = BattleCache::default();
        let calls = Cell::new(0);
        for _ in 0..3 {
            let p = cache.playability(|| {
                calls.set(calls.get() + 1);
                Playability::IsDamaged
            });
            assert_eq!(p, Playability::IsDamaged);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_complete_fills_quick() {
        let cache = BattleCache::default();
        cache.prepare(ResultLevel::COMPLETE_RESULT, || quick(9), || Complete(-1));
        assert_eq!(cache.quick().map(|q| q.outcomes[0]), Some(-1));
        assert!(cache.level().contains(ResultLevel::QUICK_OUTCOME));
        assert!(cache.level().contains(ResultLevel::COMPLETE_RESULT));

        // Lower tier afterwards is a no-op.
        cache.prepare(
            ResultLevel::QUICK_OUTCOME,
            || panic!("quick must not run"),
            || panic!("complete must not run"),
        );
    }

    #[test]
    fn test_quick_then_complete_keeps_quick() {
        let cache = BattleCache::default();
        cache.prepare(ResultLevel::QUICK_OUTCOME, || quick(3), || Complete(3));
        assert!(cache.complete().is_none());
        assert!(!cache.level().contains(ResultLevel::COMPLETE_RESULT));

        let runs = Cell::new(0);
        for _ in 0..2 {
            cache.prepare(
                ResultLevel::COMPLETE_RESULT,
                || panic!("quick must not run"),
                || {
                    runs.set(runs.get() + 1);
                    Complete(3)
                },
            );
        }
        assert_eq!(runs.get(), 1);
        assert_eq!(cache.quick().map(|q| q.outcomes[0]), Some(3));
    }
}
