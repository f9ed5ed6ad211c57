pub mod alphabet;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod predictor;
pub mod structs;
pub mod util;
pub mod validate;
