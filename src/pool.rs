//! Arena of animated units split into active and parked sets.
//!
//! # Invariants
//!
//! 1. Every unit is in exactly one of `active` or `inactive`.
//! 2. Units are never destroyed while the pool lives; `release` parks them.
//! 3. The pool never shrinks on its own; callers release units one at a time
//!    once their animation has finished.
//!
//! Unit state is only writable inside the crate, so these hold for any
//! sequence of calls through the public API.

use std::collections::BTreeSet;

use crate::animation::AnimationDescriptor;

/// Stable handle to a unit; an index into the pool's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub usize);

/// The most recent animation started on a unit.
#[derive(Debug)]
pub struct Playback<A> {
    pub descriptor: AnimationDescriptor,
    pub handle: A,
}

#[derive(Debug)]
pub struct Unit<E, A> {
    element: E,
    /// A resize happened after the current animation started.
    pub(crate) stale: bool,
    /// Set while an animation is running and its completion has not fired.
    pub(crate) in_flight: bool,
    pub(crate) playback: Option<Playback<A>>,
}

impl<E, A> Unit<E, A> {
    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn stale(&self) -> bool {
        self.stale
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn playback(&self) -> Option<&Playback<A>> {
        self.playback.as_ref()
    }
}

/// Snapshot of the pool's sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub target: usize,
    pub active: usize,
    pub inactive: usize,
}

/// Units activated by one [`ElementPool::ensure_target`] call.
#[derive(Debug)]
pub struct Growth<X> {
    /// Parked units moved back to active.
    pub reused: Vec<UnitId>,
    /// Brand-new units.
    pub created: Vec<UnitId>,
    /// Set when `create` failed; growth stopped there.
    pub error: Option<X>,
}

impl<X> Growth<X> {
    pub fn activated(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.reused.iter().chain(&self.created).copied()
    }
}

#[derive(Debug)]
pub struct ElementPool<E, A> {
    units: Vec<Unit<E, A>>,
    active: BTreeSet<UnitId>,
    inactive: Vec<UnitId>,
}

impl<E, A> Default for ElementPool<E, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, A> ElementPool<E, A> {
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            active: BTreeSet::new(),
            inactive: Vec::new(),
        }
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit<E, A>> {
        self.units.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit<E, A>> {
        self.units.get_mut(id.0)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn inactive_len(&self) -> usize {
        self.inactive.len()
    }

    /// Active units whose animation started before the latest resize.
    pub fn stale_len(&self) -> usize {
        self.active
            .iter()
            .filter(|id| self.units[id.0].stale)
            .count()
    }

    pub fn is_active(&self, id: UnitId) -> bool {
        self.active.contains(&id)
    }

    pub fn inactive_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.inactive.iter().copied()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit<E, A>> {
        self.units.iter()
    }

    pub fn stats(&self, target: usize) -> PoolStats {
        PoolStats {
            target,
            active: self.active.len(),
            inactive: self.inactive.len(),
        }
    }

    /// Grows `active` up to `target`, reusing parked units before calling
    /// `create` for new ones. Never shrinks.
    pub fn ensure_target<X>(
        &mut self,
        target: usize,
        mut create: impl FnMut() -> Result<E, X>,
    ) -> Growth<X> {
        let mut growth = Growth {
            reused: Vec::new(),
            created: Vec::new(),
            error: None,
        };

        while self.active.len() < target {
            if let Some(id) = self.inactive.pop() {
                self.active.insert(id);
                growth.reused.push(id);
                continue;
            }

            match create() {
                Ok(element) => {
                    let id = UnitId(self.units.len());
                    self.units.push(Unit {
                        element,
                        stale: false,
                        in_flight: false,
                        playback: None,
                    });
                    self.active.insert(id);
                    growth.created.push(id);
                }
                Err(e) => {
                    growth.error = Some(e);
                    break;
                }
            }
        }

        growth
    }

    /// Parks an active unit. Its element is kept for reuse.
    ///
    /// # Panics
    ///
    /// If `id` is not active.
    pub fn release(&mut self, id: UnitId) {
        assert!(self.active.remove(&id), "release of non-active unit {id:?}");
        let unit = &mut self.units[id.0];
        unit.stale = false;
        unit.in_flight = false;
        self.inactive.push(id);
    }

    /// Flags every active unit as predating the latest resize.
    pub fn mark_all_active_stale(&mut self) {
        for id in &self.active {
            self.units[id.0].stale = true;
        }
    }

    /// Panics if the active/inactive partition is torn.
    pub fn check_invariants(&self) {
        let mut seen = vec![false; self.units.len()];
        for id in self.active.iter().chain(&self.inactive) {
            let slot = seen
                .get_mut(id.0)
                .unwrap_or_else(|| panic!("unknown unit {id:?}"));
            assert!(!*slot, "unit {id:?} is both active and inactive");
            *slot = true;
        }
        if let Some(orphan) = seen.iter().position(|s| !s) {
            panic!("unit {orphan} is neither active nor inactive");
        }
        for id in &self.inactive {
            assert!(
                !self.units[id.0].in_flight,
                "parked unit {id:?} is still animating"
            );
        }
    }
}
