pub mod loader;
pub mod schema;
pub mod split;

pub use loader::{load_dataset, parse_clump_csv, parse_wdbc_csv, Dataset};
pub use schema::{FeatureSchema, Variant, CLUMP_FEATURES, WDBC_FEATURES};
pub use split::{train_test_split, TrainTestSplit};
