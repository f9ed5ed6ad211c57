pub mod protein;
pub mod record;

pub use protein::Protein;
pub use record::{PeptideLengths, PredictionRecord};
