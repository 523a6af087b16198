//! Resize handling and per-unit completion decisions.
//!
//! Each active unit cycles through three states:
//!
//! ```text
//!            resize                 complete, active <= target
//! Animating ───────► Stale ─────────────────────────────────► Animating (fresh descriptor)
//!    ▲  │                 │
//!    │  └─ complete ──────┼─ replay, same descriptor
//!    │                    │ complete, active > target
//!    │ ensure_target      ▼
//!    └────────────────  Parked
//! ```
//!
//! Running animations are never interrupted; a resize only takes effect as
//! each stale unit finishes its current fall.

use log::{debug, error, trace, warn};

use crate::animation::AnimationDescriptor;
use crate::config::SquaresConfig;
use crate::error::HostError;
use crate::pool::{ElementPool, Playback, PoolStats, UnitId};
use crate::random::RandomSource;
use crate::viewport::Viewport;

/// The rendering surface and animation engine the coordinator drives.
///
/// `animate` must not invoke the completion synchronously; completions are
/// delivered later through [`Coordinator::complete`].
pub trait AnimationHost {
    type Element;
    type Handle;

    /// Creates an element with `color_class` and attaches it to the container.
    fn create(&mut self, color_class: &str) -> Result<Self::Element, HostError>;

    /// Re-attaches a parked element.
    fn attach(&mut self, element: &Self::Element) -> Result<(), HostError>;

    /// Detaches an element from rendering without destroying it.
    fn detach(&mut self, element: &Self::Element);

    /// Starts playing `descriptor` on `element`. Completion must be reported
    /// for `id`.
    fn animate(
        &mut self,
        id: UnitId,
        element: &Self::Element,
        descriptor: &AnimationDescriptor,
    ) -> Result<Self::Handle, HostError>;

    /// Plays a finished animation again from the start.
    fn replay(&mut self, handle: &Self::Handle) -> Result<(), HostError>;
}

/// What a completion did with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// No resize since the animation started; the same animation runs again.
    Replayed,
    /// Stale with room in the pool; a freshly sampled animation started.
    Restarted,
    /// Stale with too many active units, or the host failed; unit parked.
    Parked,
}

pub struct Coordinator<H: AnimationHost, R> {
    config: SquaresConfig,
    host: H,
    rng: R,
    pool: ElementPool<H::Element, H::Handle>,
    viewport: Viewport,
    target: usize,
}

impl<H: AnimationHost, R: RandomSource> Coordinator<H, R> {
    /// An empty coordinator; nothing animates until the first [`resize`](Self::resize).
    pub fn new(config: SquaresConfig, host: H, rng: R) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid config: {config:?}");
        Self {
            config,
            host,
            rng,
            pool: ElementPool::new(),
            viewport: Viewport::default(),
            target: 0,
        }
    }

    pub fn config(&self) -> &SquaresConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn pool(&self) -> &ElementPool<H::Element, H::Handle> {
        &self.pool
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn stats(&self) -> PoolStats {
        self.pool.stats(self.target)
    }

    /// Applies a settled viewport size.
    ///
    /// Call once per debounced burst of resize events, including once at
    /// startup.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.target = viewport.target_size(self.config.px_per_unit);
        debug!(
            "resize to {}x{}: target {} (active {}, parked {})",
            viewport.width,
            viewport.height,
            self.target,
            self.pool.active_len(),
            self.pool.inactive_len()
        );

        self.pool.mark_all_active_stale();

        let Self {
            config,
            host,
            rng,
            pool,
            target,
            ..
        } = self;
        let growth = pool.ensure_target(*target, || {
            let last = config.color_classes.len().saturating_sub(1);
            let idx = rng.uniform_int(0, last);
            host.create(config.color_classes.get(idx).map_or("", String::as_str))
        });
        if let Some(e) = &growth.error {
            warn!("could not create square: {e}");
        }

        for &id in &growth.reused {
            let Some(unit) = self.pool.get(id) else {
                continue;
            };
            if let Err(e) = self.host.attach(unit.element()) {
                warn!("could not re-attach square {id:?}: {e}");
                self.pool.release(id);
            }
        }
        for id in growth.activated() {
            if self.pool.is_active(id) {
                self.launch(id);
            }
        }
    }

    /// Handles the end of `id`'s animation.
    ///
    /// Returns `None` when `id` has no running animation, which means the
    /// host reported a completion it should not have.
    pub fn complete(&mut self, id: UnitId) -> Option<Fate> {
        let active = self.pool.is_active(id);
        let running = self.pool.get_mut(id).filter(|u| active && u.in_flight);
        let Some(unit) = running else {
            error!("completion for square {id:?} which is not animating");
            return None;
        };
        unit.in_flight = false;

        let fate = if unit.stale {
            if self.pool.active_len() > self.target {
                self.park(id);
                Fate::Parked
            } else {
                self.launch(id)
            }
        } else {
            self.replay(id)
        };

        trace!("square {id:?} completed: {fate:?}");
        Some(fate)
    }

    /// Starts a freshly sampled animation on an active unit.
    fn launch(&mut self, id: UnitId) -> Fate {
        let descriptor = AnimationDescriptor::build(self.viewport, &self.config, &mut self.rng);
        let Some(unit) = self.pool.get_mut(id) else {
            return Fate::Parked;
        };
        debug_assert!(!unit.in_flight, "square {id:?} already animating");

        match self.host.animate(id, unit.element(), &descriptor) {
            Ok(handle) => {
                unit.playback = Some(Playback { descriptor, handle });
                unit.stale = false;
                unit.in_flight = true;
                Fate::Restarted
            }
            Err(e) => {
                warn!("could not animate square {id:?}: {e}");
                self.park(id);
                Fate::Parked
            }
        }
    }

    fn replay(&mut self, id: UnitId) -> Fate {
        let Some(unit) = self.pool.get_mut(id) else {
            return Fate::Parked;
        };
        let Some(playback) = &unit.playback else {
            return self.launch(id);
        };

        match self.host.replay(&playback.handle) {
            Ok(()) => {
                unit.in_flight = true;
                Fate::Replayed
            }
            Err(e) => {
                warn!("could not replay square {id:?}: {e}");
                self.launch(id)
            }
        }
    }

    fn park(&mut self, id: UnitId) {
        if let Some(unit) = self.pool.get(id) {
            self.host.detach(unit.element());
        }
        self.pool.release(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FastRandom;

    /// Records every host call; completions are driven by the test.
    #[derive(Default)]
    struct RecordingHost {
        created: Vec<String>,
        attached: usize,
        detached: usize,
        animations: Vec<(UnitId, AnimationDescriptor)>,
        replays: usize,
        fail_animate: bool,
    }

    impl AnimationHost for RecordingHost {
        type Element = usize;
        type Handle = usize;

        fn create(&mut self, color_class: &str) -> Result<usize, HostError> {
            self.created.push(color_class.to_owned());
            Ok(self.created.len() - 1)
        }

        fn attach(&mut self, _: &usize) -> Result<(), HostError> {
            self.attached += 1;
            Ok(())
        }

        fn detach(&mut self, _: &usize) {
            self.detached += 1;
        }

        fn animate(
            &mut self,
            id: UnitId,
            _: &usize,
            descriptor: &AnimationDescriptor,
        ) -> Result<usize, HostError> {
            if self.fail_animate {
                return Err(HostError::Js("animate unsupported".into()));
            }
            self.animations.push((id, descriptor.clone()));
            Ok(self.animations.len() - 1)
        }

        fn replay(&mut self, _: &usize) -> Result<(), HostError> {
            self.replays += 1;
            Ok(())
        }
    }

    type TestCoordinator = Coordinator<RecordingHost, FastRandom>;

    fn coordinator() -> TestCoordinator {
        Coordinator::new(
            SquaresConfig::default(),
            RecordingHost::default(),
            FastRandom::with_seed(17),
        )
    }

    fn descriptor(c: &TestCoordinator, id: UnitId) -> AnimationDescriptor {
        let unit = c.pool().get(id).unwrap();
        unit.playback().unwrap().descriptor.clone()
    }

    fn stats(target: usize, active: usize, inactive: usize) -> PoolStats {
        PoolStats {
            target,
            active,
            inactive,
        }
    }

    #[test]
    fn first_resize_fills_pool() {
        let mut c = coordinator();
        c.resize(Viewport::new(1200.0, 800.0));

        assert_eq!(c.stats(), stats(100, 100, 0));
        assert_eq!(c.viewport(), Viewport::new(1200.0, 800.0));
        assert_eq!(c.host().animations.len(), 100);
        let classes = &c.config().color_classes;
        assert!(c.host().created.iter().all(|class| classes.contains(class)));
        c.pool().check_invariants();
    }

    #[test]
    fn completion_without_resize_replays_same_descriptor() {
        let mut c = coordinator();
        c.resize(Viewport::new(120.0, 100.0));
        let before = descriptor(&c, UnitId(3));

        assert_eq!(c.complete(UnitId(3)), Some(Fate::Replayed));
        assert_eq!(descriptor(&c, UnitId(3)), before);
        assert_eq!(c.host().replays, 1);
        assert_eq!(c.host().animations.len(), 10);
    }

    #[test]
    fn stale_with_room_gets_fresh_descriptor() {
        let mut c = coordinator();
        c.resize(Viewport::new(120.0, 100.0));
        let before = descriptor(&c, UnitId(0));

        c.resize(Viewport::new(240.0, 300.0));
        assert_eq!(c.viewport().height, 300.0);
        assert_eq!(c.stats().active, 20);
        assert_eq!(c.pool().stale_len(), 10);
        assert_eq!(c.complete(UnitId(0)), Some(Fate::Restarted));

        let after = descriptor(&c, UnitId(0));
        assert_ne!(after, before);
        assert_eq!(after.end.translate_y, 330.0);
        assert!(!c.pool().get(UnitId(0)).unwrap().stale());
        assert_eq!(c.pool().stale_len(), 9);
    }

    #[test]
    fn stale_with_excess_parks() {
        let mut c = coordinator();
        c.resize(Viewport::new(1200.0, 800.0));
        c.resize(Viewport::new(960.0, 800.0));
        assert_eq!(c.target(), 80);

        for i in 0..100 {
            c.complete(UnitId(i));
            c.pool().check_invariants();
        }

        assert_eq!(c.stats(), stats(80, 80, 20));
        assert_eq!(c.host().detached, 20);
    }

    #[test]
    fn regrowth_reuses_parked_units() {
        let mut c = coordinator();
        c.resize(Viewport::new(120.0, 100.0));
        c.resize(Viewport::new(60.0, 100.0));
        for i in 0..10 {
            c.complete(UnitId(i));
        }
        assert_eq!(c.stats().inactive, 5);

        c.resize(Viewport::new(144.0, 100.0));
        assert_eq!(c.stats(), stats(12, 12, 0));
        assert_eq!(c.host().attached, 5);
        assert_eq!(c.host().created.len(), 12);
    }

    #[test]
    fn zero_width_drains_active() {
        let mut c = coordinator();
        c.resize(Viewport::new(120.0, 100.0));
        c.resize(Viewport::new(0.0, 0.0));
        for i in 0..10 {
            assert_eq!(c.complete(UnitId(i)), Some(Fate::Parked));
        }
        assert_eq!(c.stats(), stats(0, 0, 10));
    }

    #[test]
    fn spurious_completion_is_ignored() {
        let mut c = coordinator();
        c.resize(Viewport::new(24.0, 100.0));
        c.resize(Viewport::new(12.0, 100.0));
        assert_eq!(c.complete(UnitId(0)), Some(Fate::Parked));

        assert_eq!(c.complete(UnitId(0)), None);
        assert_eq!(c.complete(UnitId(99)), None);
        c.pool().check_invariants();
    }

    #[test]
    fn animate_failure_parks_unit() {
        let host = RecordingHost {
            fail_animate: true,
            ..Default::default()
        };
        let mut c = Coordinator::new(SquaresConfig::default(), host, FastRandom::with_seed(1));
        c.resize(Viewport::new(60.0, 100.0));

        assert_eq!(c.stats(), stats(5, 0, 5));
        c.pool().check_invariants();
    }
}
