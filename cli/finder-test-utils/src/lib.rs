//! Shared fixtures for tests across the finder workspace.

pub mod fixtures;
pub mod proptest;
