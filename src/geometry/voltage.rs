use std::fmt;
use std::sync::Arc;

/// Anything that can report a conductor voltage at a given time.
pub trait VoltageSource: Send + Sync {
    /// Voltage at simulation time `time`.
    fn voltage_at(&self, time: f64) -> f64;
}

/// Voltage specification of a conductor.
#[derive(Clone)]
pub enum Voltage {
    /// Fixed value.
    Fixed(f64),
    /// Function of simulation time.
    OfTime(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
    /// External object providing voltage at a time.
    Source(Arc<dyn VoltageSource>),
}

impl Voltage {
    /// Wraps a closure of time.
    pub fn of_time(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::OfTime(Arc::new(f))
    }

    /// Evaluates the voltage at `time`.
    #[must_use]
    pub fn at(&self, time: f64) -> f64 {
        match self {
            Self::Fixed(v) => *v,
            Self::OfTime(f) => f(time),
            Self::Source(s) => s.voltage_at(time),
        }
    }
}

impl Default for Voltage {
    fn default() -> Self {
        Self::Fixed(0.0)
    }
}

impl From<f64> for Voltage {
    fn from(v: f64) -> Self {
        Self::Fixed(v)
    }
}

impl fmt::Debug for Voltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::OfTime(_) => f.write_str("OfTime(..)"),
            Self::Source(_) => f.write_str("Source(..)"),
        }
    }
}
