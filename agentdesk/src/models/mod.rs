mod content;
mod prediction;
mod presentation;

pub use content::{ContentKind, ContentLength, LengthSpec};
pub use prediction::{DataPoint, RegressionResult};
pub use presentation::{Slide, Theme};
