// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod context;
pub mod navigation;
pub mod presenter;
pub mod roster;
pub mod runtime;
pub mod store;
pub mod timer;
pub mod ui;

/// Cadence of the external tick source in milliseconds. Both countdown
/// timers expect exactly one tick per elapsed second.
pub const TICK_RATE_MS: u64 = 1000;
