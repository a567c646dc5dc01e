//! Debounce and throttle wrappers for callbacks, driven by tokio timers.
//!
//! # Architecture Overview
//!
//! ```text
//!   event source ──call(args)──▶ ┌──────────────┐   run(args)   ┌──────────┐
//!                                │ rate wrapper │ ────────────▶ │ callback │
//!                                │ debounce /   │               └──────────┘
//!                                │ throttle     │
//!                                └──────┬───────┘
//!                                       │ arm / cancel / claim
//!                                ┌──────▼───────┐   ┌───────┐
//!                                │  timer slot  │   │ clock │
//!                                │ (tokio task) │   │       │
//!                                └──────────────┘   └───────┘
//!
//!   pacer binary: config (scenario TOML) → replay → JSON report
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod rate;
pub mod replay;

pub use error::PacerError;
pub use rate::{debounce, throttle, Debouncer, RateLimited, ThrottleOptions, Throttler};
