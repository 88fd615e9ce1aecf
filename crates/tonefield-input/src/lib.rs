//! Input capture: held keys, pointer-look deltas, and named movement bindings.

pub mod bindings;
pub mod keyboard;
pub mod mouse;

pub use bindings::{BindingError, MoveAction, MoveBindings, parse_key_name};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
