//! Core panel behaviour: geometry, drag tracking, animation and the state
//! machine tying them together.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The host
//! drives it with pointer samples and frame ticks and receives layout and
//! visibility callbacks through the traits in [`host`].

pub mod animation;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod panel;
