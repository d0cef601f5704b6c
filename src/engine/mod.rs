//! Model selection by project similarity and inference with decision traces.

pub mod predictor;
pub mod selector;

pub use predictor::{evaluate, predict, Verdict};
pub use selector::{describe_models, most_similar, select, Selection};
