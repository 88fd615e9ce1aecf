//! Scripted observer input for headless runs.

use glam::DVec2;
use tonefield_input::MoveAction;

/// Hold `hold` and move the pointer by `look_per_tick` for `ticks` ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkSegment {
    pub ticks: u32,
    pub hold: &'static [MoveAction],
    pub look_per_tick: DVec2,
}

const HALF_TURN_TICKS: u32 = 60;
// π over 60 ticks at the default 0.002 rad per unit.
const HALF_TURN_STEP: f64 = 26.18;

/// Sweep the world in long passes joined by short sidesteps.
pub const LAWNMOWER: &[WalkSegment] = &[
    WalkSegment {
        ticks: 360,
        hold: &[MoveAction::Forward],
        look_per_tick: DVec2::ZERO,
    },
    WalkSegment {
        ticks: 20,
        hold: &[MoveAction::Right],
        look_per_tick: DVec2::ZERO,
    },
    WalkSegment {
        ticks: HALF_TURN_TICKS,
        hold: &[],
        look_per_tick: DVec2::new(HALF_TURN_STEP, 0.0),
    },
    WalkSegment {
        ticks: 360,
        hold: &[MoveAction::Forward],
        look_per_tick: DVec2::ZERO,
    },
    WalkSegment {
        ticks: 20,
        hold: &[MoveAction::Left],
        look_per_tick: DVec2::ZERO,
    },
    WalkSegment {
        ticks: HALF_TURN_TICKS,
        hold: &[],
        look_per_tick: DVec2::new(-HALF_TURN_STEP, 0.0),
    },
];

/// Endless cursor over a list of segments, wrapping at the end.
#[derive(Debug)]
pub struct ScriptedWalk {
    segments: &'static [WalkSegment],
    index: usize,
    remaining: u32,
}

impl ScriptedWalk {
    pub fn new(segments: &'static [WalkSegment]) -> Self {
        Self {
            segments,
            index: 0,
            remaining: segments.first().map_or(0, |s| s.ticks),
        }
    }

    /// Segment driving the next tick. `None` if the script is empty or all
    /// of its segments are zero-length.
    pub fn next_step(&mut self) -> Option<&'static WalkSegment> {
        if self.segments.iter().all(|s| s.ticks == 0) {
            return None;
        }
        while self.remaining == 0 {
            self.index = (self.index + 1) % self.segments.len();
            self.remaining = self.segments[self.index].ticks;
        }
        self.remaining -= 1;
        Some(&self.segments[self.index])
    }
}
