pub mod delta;
pub mod extent;
pub mod frame;
pub mod shape;
pub mod solid;
pub mod voltage;

pub use delta::{Delta, Parity, ParityThresholds};
pub use extent::Extent;
pub use frame::{Frame, Orientation};
pub use shape::{next_condid, ConductorAttrs, Intercept, Node, Shape};
pub use solid::{Primitive, Solid};
pub use voltage::{Voltage, VoltageSource};
