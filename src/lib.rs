//! Profile Collector — submit a profile lookup job and poll it to completion.

pub mod cli;
pub mod config;
pub mod error;
pub mod jobs;
pub mod projector;
