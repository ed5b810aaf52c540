//! Terminal commands
//!
//! The binary's consumer side: it drives the engine and prints snapshots.

pub mod once;
pub mod render;
pub mod watch;

pub use once::once;
pub use render::render_snapshot;
pub use watch::{parse_control_line, watch, ControlCommand};
