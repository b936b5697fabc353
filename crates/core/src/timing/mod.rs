pub mod duration;
pub mod tempo;

pub use duration::{estimate_duration, TimingRules};
pub use tempo::TempoCurve;
