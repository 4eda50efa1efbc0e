//! Pointer input and the pending object
//!
//! Screen coordinates are output pixels; world coordinates are screen
//! coordinates divided by the render scale.

use dinnye_core::{Address, EngineError, SimulationEngine};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The "next to drop" object the user is aiming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingObject {
    /// World position; only `x` reaches the engine.
    pub position: Vec2,
    pub size_class: u32,
    /// Reserved per-object seed, always zero for now.
    pub seed: i32,
}

pub struct InputController<R = StdRng> {
    pending: PendingObject,
    scale: f32,
    size_classes: u32,
    rng: R,
}

impl InputController<StdRng> {
    pub fn new(scale: f32, size_classes: u32) -> Self {
        Self::with_rng(scale, size_classes, StdRng::from_entropy())
    }
}

impl<R: Rng> InputController<R> {
    /// Controller drawing size classes from `rng`, with a pending object at
    /// the world origin.
    pub fn with_rng(scale: f32, size_classes: u32, mut rng: R) -> Self {
        let size_classes = size_classes.max(1);
        let pending = Self::fresh(&mut rng, size_classes, Vec2::ZERO);
        Self {
            pending,
            scale,
            size_classes,
            rng,
        }
    }

    fn fresh(rng: &mut R, size_classes: u32, position: Vec2) -> PendingObject {
        PendingObject {
            position,
            size_class: rng.gen_range(0..size_classes),
            seed: 0,
        }
    }

    pub fn pending(&self) -> &PendingObject {
        &self.pending
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        if self.scale > 0.0 {
            screen / self.scale
        } else {
            Vec2::ZERO
        }
    }

    /// Track the primary pointer; everything else is ignored.
    pub fn pointer_moved(&mut self, screen: Vec2, primary: bool) {
        if primary {
            self.pending.position = self.to_world(screen);
        }
    }

    /// Drop the pending object at the top of the world under `screen`, then
    /// aim a new one from the same spot.
    ///
    /// Returns whether the engine accepted the object. A refused drop still
    /// rolls a new pending object.
    pub fn commit(
        &mut self,
        engine: &mut impl SimulationEngine,
        screen: Vec2,
    ) -> Result<bool, EngineError> {
        let at = self.to_world(screen);
        let added = engine.add_object(at.x, 0.0, self.pending.size_class, self.pending.seed)?;

        if added {
            tracing::debug!(x = at.x, size_class = self.pending.size_class, "object dropped");
        } else {
            tracing::debug!(x = at.x, "engine refused new object");
        }

        self.pending = Self::fresh(&mut self.rng, self.size_classes, at);
        Ok(added)
    }

    /// Ask where the pending object would land, without changing the world.
    pub fn preview(
        &self,
        engine: &mut impl SimulationEngine,
    ) -> Result<Option<Address>, EngineError> {
        engine.preview_object(
            self.pending.position.x,
            0.0,
            self.pending.size_class,
            self.pending.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinnye_core::fake::{Call, FakeEngine};

    fn controller(scale: f32) -> InputController {
        InputController::with_rng(scale, 5, StdRng::seed_from_u64(7))
    }

    #[test]
    fn pointer_maps_through_scale() {
        let mut input = controller(7.2);
        input.pointer_moved(Vec2::new(72.0, 36.0), true);
        let pos = input.pending().position;
        assert!((pos - Vec2::new(10.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn secondary_pointer_ignored() {
        let mut input = controller(2.0);
        let before = *input.pending();
        input.pointer_moved(Vec2::new(100.0, 100.0), false);
        assert_eq!(*input.pending(), before);
    }

    #[test]
    fn move_keeps_size_and_seed() {
        let mut input = controller(2.0);
        let size_class = input.pending().size_class;
        input.pointer_moved(Vec2::new(8.0, 8.0), true);
        assert_eq!(input.pending().size_class, size_class);
        assert_eq!(input.pending().seed, 0);
    }

    #[test]
    fn commit_drops_at_top_and_replaces_pending() {
        let mut engine = FakeEngine::new();
        let mut input = controller(10.0);
        let size_class = input.pending().size_class;

        let added = input.commit(&mut engine, Vec2::new(50.0, 120.0)).unwrap();

        assert!(added);
        assert_eq!(
            engine.calls(),
            &[Call::Add {
                x: 5.0,
                y: 0.0,
                size_class,
                seed: 0
            }]
        );
        let pending = input.pending();
        assert_eq!(pending.position, Vec2::new(5.0, 12.0));
        assert!(pending.size_class < 5);
        assert_eq!(pending.seed, 0);
    }

    #[test]
    fn refused_commit_still_rolls_new_pending() {
        let mut engine = FakeEngine::new().with_capacity(0);
        let mut input = controller(1.0);

        let added = input.commit(&mut engine, Vec2::new(3.0, 4.0)).unwrap();

        assert!(!added);
        assert!(engine.objects().is_empty());
        assert_eq!(input.pending().position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn size_classes_stay_in_range() {
        let mut engine = FakeEngine::new();
        let mut input = controller(1.0);
        let mut seen = [false; 5];
        for _ in 0..200 {
            input.commit(&mut engine, Vec2::new(1.0, 0.0)).unwrap();
            seen[input.pending().size_class as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn preview_uses_pending_x_at_top() {
        let mut engine = FakeEngine::new();
        let mut input = controller(1.0);
        input.pointer_moved(Vec2::new(6.0, 9.0), true);

        let address = input.preview(&mut engine).unwrap();

        assert!(address.is_some());
        assert!(engine.objects().is_empty());
        match engine.calls() {
            [Call::Preview { x, y, seed, .. }] => {
                assert_eq!((*x, *y, *seed), (6.0, 0.0, 0));
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[test]
    fn zero_scale_maps_to_origin() {
        let input = controller(0.0);
        assert_eq!(input.to_world(Vec2::new(3.0, 3.0)), Vec2::ZERO);
    }
}
