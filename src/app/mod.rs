//! Application orchestration: terminal host, state, event loop input, and handlers.

pub mod event;
pub mod handler;
pub mod host;
pub mod state;
