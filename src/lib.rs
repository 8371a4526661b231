//! Browser history triage: locate, snapshot, and parse Firefox and Chrome
//! history databases.

pub mod cli;
pub mod config;
pub mod export;
pub mod history;
pub mod locate;
pub mod logging;
pub mod prompt;
pub mod snapshot;
