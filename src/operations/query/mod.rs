//! Batch point queries against a shape.

mod distance;
mod intercept;
mod is_inside;

pub use distance::Distance;
pub use intercept::Intercept;
pub use is_inside::IsInside;
