#![forbid(unsafe_code)]

//! Core domain model and session logic for the gym/macro head-up display.
//!
//! This crate provides:
//! - Domain types (exercises, workout days, session state, macro snapshots)
//! - The static workout catalog
//! - The speech-driven session state machine and rest timer
//! - Display projection
//! - Macro persistence and metric ingestion parsing

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod intent;
pub mod session;
pub mod timer;
pub mod display;
pub mod state;
pub mod macros;
pub mod ingest;
pub mod hud;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use session::{SessionMachine, Transition, TimerAction};
pub use timer::{RestTimer, TickOutcome, TimerToken};
pub use macros::{MacroStore, MetricsApplied};
pub use ingest::parse_metrics;
pub use hud::{Hud, HudUpdate, TimerChange};
