pub type Float = f64;
pub type Matrix = nalgebra::DMatrix<Float>;
pub type Vector = nalgebra::DVector<Float>;

/// Integer class code as it appears in the training data (e.g. `2`/`4`, or `0`/`1`).
pub type Label = usize;
pub type Predictions = Vec<Label>;
