//! Scripted in-process engine for tests
//!
//! Behaves like a tiny simulation module: keeps its own object list, writes
//! records into a page-grown arena at a fixed base, and replaces the arena
//! storage whenever it grows so stale views would be caught by the borrow
//! checker exactly as with a real module.

use crate::arena::{negotiate_growth, PAGE_SIZE};
use crate::engine::{Address, SimulationEngine, WorldExtent};
use crate::error::EngineError;
use crate::layout::{RecordLayout, WORD_BYTES};
use crate::record::FruitRecord;
use glam::Vec2;

/// Where the fake module keeps its record array.
pub const FAKE_BASE: u32 = 1024;

const GRAVITY: f32 = 0.0078125;
const NUM_RADII: usize = 11;

/// Write `record` into `arena` at byte `offset` using `layout`.
///
/// Reserved words are left untouched.
pub fn encode_record(record: &FruitRecord, layout: &RecordLayout, arena: &mut [u8], offset: usize) {
    let mut put = |word: usize, value: u32| {
        let at = offset + word * WORD_BYTES;
        arena[at..at + WORD_BYTES].copy_from_slice(&value.to_le_bytes());
    };
    put(layout.x, record.position.x.to_bits());
    put(layout.y, record.position.y.to_bits());
    put(layout.prev_x, record.previous.x.to_bits());
    put(layout.prev_y, record.previous.y.to_bits());
    put(layout.radius, record.radius.to_bits());
    if let Some(word) = layout.orientation {
        put(word, record.orientation);
    }
    if let Some(word) = layout.size_index {
        put(word, record.size_index);
    }
}

/// Engine call as observed by the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init { seed: i32 },
    Step { seed: i32 },
    Add { x: f32, y: f32, size_class: u32, seed: i32 },
    Preview { x: f32, y: f32, size_class: u32, seed: i32 },
}

pub struct FakeEngine {
    arena: Vec<u8>,
    layout: RecordLayout,
    extent: WorldExtent,
    radii: [f32; NUM_RADII],
    objects: Vec<FruitRecord>,
    capacity: usize,
    calls: Vec<Call>,
    growths: usize,
}

impl FakeEngine {
    pub fn new() -> Self {
        let mut radii = [0.0; NUM_RADII];
        radii[0] = 1.0 / 3.0;
        for i in 1..NUM_RADII {
            radii[i] = radii[i - 1] * 1.296_839_6;
        }
        Self {
            arena: vec![0; PAGE_SIZE],
            layout: RecordLayout::CANONICAL,
            extent: WorldExtent::new(12.0, 16.0),
            radii,
            objects: Vec::new(),
            capacity: 1024,
            calls: Vec::new(),
            growths: 0,
        }
    }

    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_extent(mut self, extent: WorldExtent) -> Self {
        self.extent = extent;
        self
    }

    /// Maximum live objects before `add_object` refuses.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of times the arena storage was replaced.
    pub fn growths(&self) -> usize {
        self.growths
    }

    pub fn objects(&self) -> &[FruitRecord] {
        &self.objects
    }

    /// Same negotiation the wasm host performs on `setMemorySize`.
    fn request_memory(&mut self, bytes: usize) -> usize {
        let decision = negotiate_growth(self.arena.len(), bytes);
        if decision.grows() {
            // Fresh storage, like a wasm memory.grow detaching old views.
            let mut grown = vec![0u8; decision.resulting_len()];
            grown[..self.arena.len()].copy_from_slice(&self.arena);
            self.arena = grown;
            self.growths += 1;
        }
        decision.resulting_len()
    }

    fn slot_offset(&self, index: usize) -> usize {
        FAKE_BASE as usize + index * self.layout.stride_bytes()
    }

    fn write_all(&mut self) {
        // One spare slot for a preview record.
        let needed = self.slot_offset(self.objects.len() + 1);
        self.request_memory(needed);
        for i in 0..self.objects.len() {
            let offset = self.slot_offset(i);
            encode_record(&self.objects[i], &self.layout, &mut self.arena, offset);
        }
    }

    fn make_record(&self, x: f32, y: f32, size_class: u32, seed: i32) -> FruitRecord {
        let size_index = (size_class as usize).min(NUM_RADII - 1) as u32;
        let radius = self.radii[size_index as usize];
        let x = x.max(radius).min(self.extent.x - radius);
        let y = y.min(self.extent.y - radius);
        FruitRecord {
            position: Vec2::new(x, y),
            previous: Vec2::new(x, y),
            radius,
            orientation: (seed as u32) & 0xFFFF,
            size_index,
        }
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine for FakeEngine {
    fn init(&mut self, seed: i32) -> Result<Address, EngineError> {
        self.calls.push(Call::Init { seed });
        self.objects.clear();
        self.write_all();
        Ok(Address::new(FAKE_BASE))
    }

    fn step(&mut self, seed: i32) -> Result<Address, EngineError> {
        self.calls.push(Call::Step { seed });
        let floor = self.extent.y;
        for object in &mut self.objects {
            object.previous = object.position;
            object.position.y = (object.position.y + GRAVITY).min(floor - object.radius);
        }
        self.write_all();
        Ok(Address::new(FAKE_BASE))
    }

    fn add_object(
        &mut self,
        x: f32,
        y: f32,
        size_class: u32,
        seed: i32,
    ) -> Result<bool, EngineError> {
        self.calls.push(Call::Add {
            x,
            y,
            size_class,
            seed,
        });
        if self.objects.len() >= self.capacity {
            return Ok(false);
        }
        let record = self.make_record(x, y, size_class, seed);
        self.objects.push(record);
        self.write_all();
        Ok(true)
    }

    fn preview_object(
        &mut self,
        x: f32,
        y: f32,
        size_class: u32,
        seed: i32,
    ) -> Result<Option<Address>, EngineError> {
        self.calls.push(Call::Preview {
            x,
            y,
            size_class,
            seed,
        });
        if self.objects.len() >= self.capacity || !(0.0..=self.extent.x).contains(&x) {
            return Ok(None);
        }
        let record = self.make_record(x, y, size_class, seed);
        let offset = self.slot_offset(self.objects.len());
        self.request_memory(offset + self.layout.stride_bytes());
        encode_record(&record, &self.layout, &mut self.arena, offset);
        Ok(Some(Address::new(offset as u32)))
    }

    fn object_count(&mut self) -> Result<usize, EngineError> {
        Ok(self.objects.len())
    }

    fn world_extent(&mut self) -> Result<WorldExtent, EngineError> {
        Ok(self.extent)
    }

    fn layout(&self) -> RecordLayout {
        self.layout
    }

    fn arena(&self) -> &[u8] {
        &self.arena
    }

    fn radii(&mut self) -> Result<Vec<f32>, EngineError> {
        Ok(self.radii.to_vec())
    }
}
