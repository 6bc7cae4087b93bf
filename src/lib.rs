// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod capture;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod hunt;
pub mod leaderboard;
pub mod matcher;
pub mod runtime;
pub mod util;
