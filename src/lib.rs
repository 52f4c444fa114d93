// Public API - data types, the prober seam, the monitor loop, and export functions
pub mod config;
pub mod error;
pub mod export;
pub mod probe;
pub mod resolve;
pub mod state;
pub mod trace;
pub mod tui;

// Internal implementation - not part of public API
pub(crate) mod cli;
