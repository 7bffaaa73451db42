//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads the panel's state and turns it into cells on the
//! terminal.  No panel state is mutated here.

pub mod layout;
pub mod popup;
pub mod sheet;
pub mod theme;
