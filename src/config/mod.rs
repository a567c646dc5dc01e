//! Scenario configuration subsystem.
//!
//! # Data Flow
//! ```text
//! scenario file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ScenarioConfig (validated, immutable)
//!     → replay runner
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal scenarios
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{CallConfig, ScenarioConfig, WrapperConfig, WrapperKind};
