//! Platform-agnostic engine: axes, grids, selection overlay and session state.

pub mod axis;
pub mod format;
pub mod grid;
pub mod selection;
pub mod session;
pub mod view;
