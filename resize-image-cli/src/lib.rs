// ABOUTME: Library exports for the resize-image CLI modules for testing and external use
// ABOUTME: Makes internal modules available to integration tests

pub mod cli;
pub mod commands;
pub mod completions;
pub mod config;
pub mod output;
