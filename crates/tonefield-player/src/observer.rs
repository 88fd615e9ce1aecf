//! First-person observer: WASD walk plus pointer look, confined to the
//! world's horizontal bounds. No gravity and no terrain collision; the
//! observer keeps whatever altitude it starts at.

use glam::{DVec2, DVec3};
use std::f64::consts::FRAC_PI_2;
use tonefield_input::{KeyboardState, MouseState, MoveAction, MoveBindings};

/// Pose of the observer, shared with the camera and the audio listener.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverState {
    pub position: DVec3,
    /// Rotation about +Y in radians.
    pub yaw: f64,
    /// Elevation in radians, within `[-π/2, π/2]`.
    pub pitch: f64,
}

impl ObserverState {
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Horizontal heading `(sin yaw, 0, cos yaw)`.
    pub fn forward(&self) -> DVec3 {
        DVec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Horizontal right vector, perpendicular to [`forward`](Self::forward).
    pub fn right(&self) -> DVec3 {
        let f = self.forward();
        DVec3::new(f.z, 0.0, -f.x)
    }

    /// Point a camera at this pose should look at.
    ///
    /// At the pitch limits `tan` grows without bound, so the target sits
    /// far above or below the observer.
    pub fn look_target(&self) -> DVec3 {
        self.position + DVec3::new(self.yaw.sin(), self.pitch.tan(), self.yaw.cos())
    }
}

/// Horizontal extent the observer is confined to: `[0, width] × [0, depth]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    pub width: f64,
    pub depth: f64,
}

/// One tick's worth of input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObserverInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer motion since the previous tick, in device units.
    pub look_delta: DVec2,
}

impl ObserverInput {
    /// Sample held keys and drain the accumulated pointer delta.
    pub fn from_devices(
        keyboard: &KeyboardState,
        mouse: &mut MouseState,
        bindings: &MoveBindings,
    ) -> Self {
        Self {
            forward: bindings.is_held(keyboard, MoveAction::Forward),
            back: bindings.is_held(keyboard, MoveAction::Back),
            left: bindings.is_held(keyboard, MoveAction::Left),
            right: bindings.is_held(keyboard, MoveAction::Right),
            look_delta: mouse.take_delta().as_dvec2(),
        }
    }
}

/// Integrates input into an [`ObserverState`] once per tick.
#[derive(Clone, Debug)]
pub struct ObserverController {
    state: ObserverState,
    bounds: WorldBounds,
    /// World units moved per tick per held direction.
    speed: f64,
    /// Radians of rotation per unit of pointer motion.
    look_sensitivity: f64,
}

impl ObserverController {
    pub fn new(start: DVec3, bounds: WorldBounds, speed: f64, look_sensitivity: f64) -> Self {
        Self {
            state: ObserverState::new(start),
            bounds,
            speed,
            look_sensitivity,
        }
    }

    pub fn state(&self) -> &ObserverState {
        &self.state
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Advance one tick.
    ///
    /// Movement uses the heading from before this tick's look update, so a
    /// turn takes effect on the following tick.
    pub fn tick(&mut self, input: &ObserverInput) -> &ObserverState {
        let forward = self.state.forward();
        let right = self.state.right();
        let mut position = self.state.position;

        // "Forward" walks towards -heading, matching the camera convention.
        if input.forward {
            position -= forward * self.speed;
        }
        if input.back {
            position += forward * self.speed;
        }
        if input.left {
            position -= right * self.speed;
        }
        if input.right {
            position += right * self.speed;
        }

        position.x = position.x.clamp(0.0, self.bounds.width);
        position.z = position.z.clamp(0.0, self.bounds.depth);
        self.state.position = position;

        self.state.yaw -= input.look_delta.x * self.look_sensitivity;
        self.state.pitch = (self.state.pitch - input.look_delta.y * self.look_sensitivity)
            .clamp(-FRAC_PI_2, FRAC_PI_2);

        &self.state
    }
}
