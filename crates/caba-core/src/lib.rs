//! Domain model and consolidation logic for CABA (cab booking analyzer).
//!
//! Raw trip records extracted from PDF receipts are normalized into
//! [`TripRecord`]s and folded by date into [`ConsolidatedRow`]s, one per
//! distinct date, ready for a spreadsheet sink.

pub mod app_config;
pub mod config;
pub mod consolidate;
pub mod date_order;
pub mod error;
pub mod normalize;
pub mod settings;
pub mod types;

pub use app_config::AppConfig;
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use consolidate::{consolidate, ConsolidateOptions, Consolidator, Emptiness};
pub use date_order::DateOrdering;
pub use error::{ConfigError, NormalizeError, SettingsError};
pub use normalize::normalize;
pub use settings::{Settings, SettingsKey, SettingsStore};
pub use types::{ConsolidatedRow, RawRecord, Scalar, TripRecord, Visits};

/// First writable data row of the reference spreadsheet layout.
pub const DEFAULT_START_ROW: u32 = 9;
