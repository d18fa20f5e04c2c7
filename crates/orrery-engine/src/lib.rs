//! Orrery engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the viewer:
//! window/event-loop runtime, device + surface management, frame timing,
//! and the 3D scene render path.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
