//! Command implementations for the rigup CLI

pub mod auth;
pub mod bootstrap;
pub mod completions;
pub mod doctor;
pub mod scaffold;
