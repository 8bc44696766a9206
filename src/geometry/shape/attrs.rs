use std::sync::atomic::{AtomicI32, Ordering};

use crate::geometry::Voltage;

static NEXT_CONDID: AtomicI32 = AtomicI32::new(1);

/// Hands out a fresh conductor id from the process-wide counter.
pub fn next_condid() -> i32 {
    NEXT_CONDID.fetch_add(1, Ordering::Relaxed)
}

/// Attributes every conductor carries.
#[derive(Debug, Clone)]
pub struct ConductorAttrs {
    /// Voltage of the conductor.
    pub voltage: Voltage,
    /// Conductor id reported by queries and solver arrays.
    pub condid: i32,
    /// Material tag.
    pub material: String,
    /// Optional name.
    pub name: Option<String>,
    /// Neumann rather than Dirichlet boundary.
    pub neumann: bool,
}

impl Default for ConductorAttrs {
    fn default() -> Self {
        Self {
            voltage: Voltage::default(),
            condid: 1,
            material: "C".into(),
            name: None,
            neumann: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_ids_are_distinct() {
        let a = next_condid();
        let b = next_condid();
        assert_ne!(a, b);
    }
}
