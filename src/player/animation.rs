//! Player walk-cycle frame selection.
//!
//! Each direction has three distinct images per gender. The walk cycle
//! plays them as `0, 1, 0, 2` (step, pause, step, pause), 15 ticks per
//! phase, so one full cycle lasts 60 ticks. Standing still always shows
//! image 0 of the current direction.

use crate::shared::*;

pub const FRAMES_PER_DIRECTION: usize = 3;
pub const TICKS_PER_PHASE: u32 = 15;
pub const TICKS_PER_CYCLE: u32 = 60;
pub const WALK_CYCLE: [usize; 4] = [0, 1, 0, 2];

/// Frames for every (gender, direction) pair, built once and never mutated.
#[derive(Debug, Clone)]
pub struct AnimationTable<H> {
    // [gender][direction] -> frames
    frames: [[[H; FRAMES_PER_DIRECTION]; 4]; 2],
}

impl<H> AnimationTable<H> {
    /// Builds the table by asking `load` for every frame.
    pub fn build(mut load: impl FnMut(Gender, Facing, usize) -> H) -> Self {
        // Order matches Gender::index and Facing::index.
        let frames = [Gender::Female, Gender::Male].map(|gender| {
            [Facing::South, Facing::North, Facing::East, Facing::West]
                .map(|facing| [0, 1, 2].map(|n| load(gender, facing, n)))
        });
        Self { frames }
    }

    pub fn frames(&self, gender: Gender, facing: Facing) -> &[H; FRAMES_PER_DIRECTION] {
        &self.frames[gender.index()][facing.index()]
    }
}

/// Asset path for one frame, e.g. `animations/S_F/S1.png`.
pub fn frame_path(gender: Gender, facing: Facing, frame: usize) -> String {
    format!(
        "animations/{dir}_{gender}/{dir}{frame}.png",
        dir = facing.code(),
        gender = gender.code(),
    )
}

/// Which of the three images to show. The direction only picks the row,
/// so it does not influence the index.
pub fn current_frame(_facing: Facing, moving: bool, frame_counter: u32) -> usize {
    if !moving {
        return 0;
    }
    let phase = (frame_counter % TICKS_PER_CYCLE) / TICKS_PER_PHASE;
    WALK_CYCLE[phase as usize % WALK_CYCLE.len()]
}

pub struct AnimationController<H> {
    table: AnimationTable<H>,
}

impl<H> AnimationController<H> {
    pub fn new(table: AnimationTable<H>) -> Self {
        Self { table }
    }

    pub fn sprite(&self, gender: Gender, facing: Facing, moving: bool, frame_counter: u32) -> &H {
        let index = current_frame(facing, moving, frame_counter);
        &self.table.frames(gender, facing)[index]
    }
}
