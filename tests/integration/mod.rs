//! Integration tests for the simulated filesystem

mod mutation_safety;
mod properties;
mod resolution;
mod seed_loading;
mod shell_sessions;
