//! Frame scheduling
//!
//! One frame is strictly sequential: seed, `init` or `step`, preview, count,
//! decode, draw. Nothing borrows the arena across an engine call, so a growth
//! inside any of them cannot leave a stale view behind.

use dinnye_core::{
    glam::Vec2, Address, DecodeError, DecodedFrame, EngineError, FrameDecoder, SeedSource,
    SimulationEngine,
};
use dinnye_render::{FruitRenderer, Painter};
use dinnye_services::InputController;
use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Next frame calls `init`.
    Bootstrapping,
    /// Every further frame calls `step`.
    Running,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// State the frame ran in.
    pub state: SchedulerState,
    pub seed: i32,
    pub base: Address,
    pub live: usize,
    pub preview: bool,
}

pub struct FrameScheduler<E, R = StdRng> {
    engine: E,
    input: InputController<R>,
    renderer: FruitRenderer,
    seeds: SeedSource,
    decoder: FrameDecoder,
    frame: DecodedFrame,
    state: SchedulerState,
    frames: u64,
}

impl<E: SimulationEngine, R: Rng> FrameScheduler<E, R> {
    /// Fit the engine's world into `output_size` pixels. World extents are
    /// read once; they are constant for the life of a module.
    pub fn new(
        mut engine: E,
        mut input: InputController<R>,
        seeds: SeedSource,
        output_size: f32,
    ) -> Result<Self, EngineError> {
        let extent = engine.world_extent()?;
        let renderer = FruitRenderer::fitted(extent, output_size);
        input.set_scale(renderer.scale());

        tracing::info!(
            extent_x = extent.x,
            extent_y = extent.y,
            scale = renderer.scale(),
            "world fitted to output"
        );

        let decoder = FrameDecoder::new(engine.layout());
        Ok(Self {
            engine,
            input,
            renderer,
            seeds,
            decoder,
            frame: DecodedFrame::default(),
            state: SchedulerState::Bootstrapping,
            frames: 0,
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn seeds(&self) -> &SeedSource {
        &self.seeds
    }

    pub fn input(&self) -> &InputController<R> {
        &self.input
    }

    pub fn renderer(&self) -> &FruitRenderer {
        &self.renderer
    }

    /// Records decoded by the last frame.
    pub fn last_frame(&self) -> &DecodedFrame {
        &self.frame
    }

    /// Run one frame and draw it into `painter`.
    pub fn tick(&mut self, painter: &mut impl Painter) -> Result<FrameReport, FrameError> {
        let ran = self.state;
        let seed = self.seeds.next_seed();
        let base = match ran {
            SchedulerState::Bootstrapping => self.engine.init(seed)?,
            SchedulerState::Running => self.engine.step(seed)?,
        };
        let preview = self.input.preview(&mut self.engine)?;
        let count = self.engine.object_count()?;

        self.decoder
            .decode_into(self.engine.arena(), base, count, preview, &mut self.frame)?;
        self.renderer.draw_frame(painter, &self.frame);
        self.frames += 1;

        if ran == SchedulerState::Bootstrapping {
            self.state = SchedulerState::Running;
            tracing::info!(%base, seed, "simulation bootstrapped");
            self.log_radii();
        }

        let report = FrameReport {
            state: ran,
            seed,
            base,
            live: self.frame.live.len(),
            preview: self.frame.preview.is_some(),
        };
        tracing::trace!(?report, "frame");
        Ok(report)
    }

    pub fn pointer_moved(&mut self, screen: Vec2, primary: bool) {
        self.input.pointer_moved(screen, primary);
    }

    /// Drop the pending object at `screen`.
    pub fn commit(&mut self, screen: Vec2) -> Result<bool, EngineError> {
        self.input.commit(&mut self.engine, screen)
    }

    fn log_radii(&mut self) {
        match self.engine.radii() {
            Ok(radii) if radii.is_empty() => {}
            Ok(radii) => tracing::info!(?radii, "radii table"),
            Err(err) => tracing::warn!(%err, "radii table unreadable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinnye_core::fake::{Call, FakeEngine, FAKE_BASE};
    use dinnye_core::WorldExtent;
    use dinnye_render::{DrawCommand, DrawList};
    use rand::SeedableRng;

    fn scheduler(engine: FakeEngine, seeds: SeedSource) -> FrameScheduler<FakeEngine> {
        let input = InputController::with_rng(1.0, 5, StdRng::seed_from_u64(3));
        FrameScheduler::new(engine, input, seeds, 720.0).unwrap()
    }

    #[test]
    fn bootstraps_once_then_steps() {
        let mut sched = scheduler(FakeEngine::new(), SeedSource::seeded(1).with_replay([10, 20, 30]));
        let mut list = DrawList::new();
        assert_eq!(sched.state(), SchedulerState::Bootstrapping);

        let first = sched.tick(&mut list).unwrap();
        assert_eq!(first.state, SchedulerState::Bootstrapping);
        assert_eq!(sched.state(), SchedulerState::Running);

        let second = sched.tick(&mut list).unwrap();
        let third = sched.tick(&mut list).unwrap();
        assert_eq!(second.state, SchedulerState::Running);
        assert_eq!((first.seed, second.seed, third.seed), (10, 20, 30));
        assert_eq!(sched.frames(), 3);

        let lifecycle: Vec<&Call> = sched
            .engine()
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Init { .. } | Call::Step { .. }))
            .collect();
        assert_eq!(
            lifecycle,
            vec![
                &Call::Init { seed: 10 },
                &Call::Step { seed: 20 },
                &Call::Step { seed: 30 }
            ]
        );
    }

    #[test]
    fn preview_queried_after_engine_call() {
        let mut sched = scheduler(FakeEngine::new(), SeedSource::seeded(1));
        sched.tick(&mut DrawList::new()).unwrap();

        let calls = sched.engine().calls();
        assert!(matches!(calls[0], Call::Init { .. }));
        assert!(matches!(calls[1], Call::Preview { y, .. } if y == 0.0));
    }

    #[test]
    fn empty_world_draws_only_preview() {
        let mut sched = scheduler(FakeEngine::new(), SeedSource::seeded(9).with_replay([1]));
        sched.pointer_moved(Vec2::new(6.0, 3.0), true);
        let mut list = DrawList::new();

        let report = sched.tick(&mut list).unwrap();

        assert_eq!(report.seed, 1);
        assert_eq!(report.base, Address::new(FAKE_BASE));
        assert_eq!(report.live, 0);
        assert!(report.preview);
        assert_eq!(list.commands()[0], DrawCommand::Clear);
        assert_eq!(list.circle_count(), 1);
    }

    #[test]
    fn rejected_preview_draws_live_records_only() {
        let mut sched = scheduler(FakeEngine::new(), SeedSource::seeded(2));
        let mut list = DrawList::new();
        sched.tick(&mut list).unwrap();
        assert!(sched.commit(Vec2::new(2.0, 0.0)).unwrap());
        assert!(sched.commit(Vec2::new(8.0, 0.0)).unwrap());

        // Left of the world: the engine reports no landing spot.
        sched.pointer_moved(Vec2::new(-5.0, 0.0), true);
        let report = sched.tick(&mut list).unwrap();

        assert_eq!(report.live, 2);
        assert!(!report.preview);
        assert_eq!(list.circle_count(), 2);
    }

    #[test]
    fn records_drawn_at_scaled_position() {
        let engine = FakeEngine::new().with_extent(WorldExtent::new(100.0, 50.0));
        let mut sched = scheduler(engine, SeedSource::seeded(4));
        assert!((sched.renderer().scale() - 7.2).abs() < 1e-5);

        let mut list = DrawList::new();
        sched.tick(&mut list).unwrap();
        // Screen x 72 is world x 10.
        assert!(sched.commit(Vec2::new(72.0, 72.0)).unwrap());
        sched.pointer_moved(Vec2::new(-1.0, 0.0), true);
        sched.tick(&mut list).unwrap();

        let record = sched.last_frame().live[0];
        assert!((record.position.x - 10.0).abs() < 1e-4);

        let translate = list
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Translate(at) => Some(*at),
                _ => None,
            })
            .unwrap();
        assert!((translate.x - 72.0).abs() < 1e-3);
        assert!((translate.y - record.position.y * 7.2).abs() < 1e-3);
    }

    #[test]
    fn seeds_are_captured_for_replay() {
        let mut sched = scheduler(FakeEngine::new(), SeedSource::seeded(5).capturing());
        let mut list = DrawList::new();
        let seeds: Vec<i32> = (0..3).map(|_| sched.tick(&mut list).unwrap().seed).collect();
        assert_eq!(sched.seeds().captured(), Some(seeds.as_slice()));
    }
}
