pub mod scale;

pub use scale::{PitchMap, ScaleSpec};
