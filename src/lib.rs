//! Core of a job orchestrator: item types and their registry, on-disk
//! configuration with stable type aliases, and build parameter resolution.

pub mod bootstrap;
pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod home;
pub mod item;
pub mod jobs;
pub mod logging;
pub mod parameters;
pub mod registry;
pub mod store;
