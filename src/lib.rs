pub mod config;
pub mod datasets;
pub mod io;
pub mod metrics;
pub mod preprocessors;
pub mod server;
pub mod training;
pub mod validation;

// Re-export public API
pub use biopsy_core::*;
pub use biopsy_models::LogisticRegression;
pub use config::{Config, ServeConfig, TrainConfig};
pub use datasets::{Dataset, Variant};
pub use preprocessors::StandardScaler;
pub use training::{train, MetricsReport, TrainingOutcome};
