pub mod error;
pub mod loss;
pub mod types;
pub mod utils;

pub use types::{Float, Label, Matrix, Predictions, Vector};

pub use error::{BiopsyError, Result};

pub use loss::{log_loss, sigmoid};
