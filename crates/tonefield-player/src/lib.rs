//! Observer controller and pose.

pub mod observer;

pub use observer::{ObserverController, ObserverInput, ObserverState, WorldBounds};
