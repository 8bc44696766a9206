//! Conductor shapes and their CSG composition.

mod attrs;
mod queries;

pub use attrs::{next_condid, ConductorAttrs};
pub use queries::Intercept;

use std::ops::{BitAnd, BitOr, Not, Sub};

use crate::error::{InstallError, Result};

use super::solid::{Primitive, Solid};
use super::{Extent, Frame};

/// Node of a shape tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// A primitive solid placed by a frame.
    Leaf { solid: Primitive, frame: Frame },
    /// Complement of a shape.
    Not(Box<Shape>),
    /// Intersection.
    And(Box<Shape>, Box<Shape>),
    /// Union.
    Or(Box<Shape>, Box<Shape>),
    /// Difference, left minus right.
    Minus(Box<Shape>, Box<Shape>),
}

/// A conductor shape: primitive or CSG composite, with conductor attributes
/// and a bounding extent computed at construction.
#[derive(Debug, Clone)]
pub struct Shape {
    node: Node,
    attrs: ConductorAttrs,
    extent: Extent,
}

impl Shape {
    /// Places a primitive.
    #[must_use]
    pub fn primitive(solid: Primitive, frame: Frame, attrs: ConductorAttrs) -> Self {
        let extent = frame.extent_to_world(&solid.extent());
        Self {
            node: Node::Leaf { solid, frame },
            attrs,
            extent,
        }
    }

    fn composite(node: Node, attrs: ConductorAttrs, extent: Extent) -> Self {
        Self { node, attrs, extent }
    }

    /// Attributes of a composite: the left operand's, with the right name as
    /// a fallback.
    fn inherit(left: &Shape, right: &Shape) -> ConductorAttrs {
        let mut attrs = left.attrs.clone();
        if attrs.name.is_none() {
            attrs.name.clone_from(&right.attrs.name);
        }
        attrs
    }

    /// Intersection of two shapes.
    #[must_use]
    pub fn and(self, right: Shape) -> Shape {
        let attrs = Self::inherit(&self, &right);
        let extent = self.extent & right.extent;
        Self::composite(Node::And(Box::new(self), Box::new(right)), attrs, extent)
    }

    /// Union of two shapes.
    #[must_use]
    pub fn or(self, right: Shape) -> Shape {
        let attrs = Self::inherit(&self, &right);
        let extent = self.extent | right.extent;
        Self::composite(Node::Or(Box::new(self), Box::new(right)), attrs, extent)
    }

    /// Difference of two shapes.
    #[must_use]
    pub fn minus(self, right: Shape) -> Shape {
        let attrs = Self::inherit(&self, &right);
        let extent = self.extent - right.extent;
        Self::composite(Node::Minus(Box::new(self), Box::new(right)), attrs, extent)
    }

    /// Complement of a shape.
    #[must_use]
    pub fn complement(self) -> Shape {
        let attrs = self.attrs.clone();
        let extent = !self.extent;
        Self::composite(Node::Not(Box::new(self)), attrs, extent)
    }

    /// The tree node.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Conductor attributes.
    #[must_use]
    pub fn attrs(&self) -> &ConductorAttrs {
        &self.attrs
    }

    /// Bounding extent.
    #[must_use]
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Conductor id.
    #[must_use]
    pub fn condid(&self) -> i32 {
        self.attrs.condid
    }

    /// Returns true if the shape imposes a Neumann boundary.
    #[must_use]
    pub fn is_neumann(&self) -> bool {
        self.attrs.neumann
    }

    /// Operands of a union, if this is one.
    #[must_use]
    pub fn as_union(&self) -> Option<(&Shape, &Shape)> {
        match &self.node {
            Node::Or(l, r) => Some((l, r)),
            _ => None,
        }
    }

    /// Checks that every leaf agrees on the boundary kind and returns it
    /// (`true` for Neumann).
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::MixedBoundaryKinds`] if Neumann and Dirichlet
    /// leaves are combined.
    pub fn boundary_kind(&self) -> Result<bool> {
        match &self.node {
            Node::Leaf { .. } => Ok(self.attrs.neumann),
            Node::Not(s) => s.boundary_kind(),
            Node::And(l, r) | Node::Or(l, r) | Node::Minus(l, r) => {
                let left = l.boundary_kind()?;
                if left == r.boundary_kind()? {
                    Ok(left)
                } else {
                    Err(InstallError::MixedBoundaryKinds.into())
                }
            }
        }
    }

    /// Number of primitive leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match &self.node {
            Node::Leaf { .. } => 1,
            Node::Not(s) => s.leaf_count(),
            Node::And(l, r) | Node::Or(l, r) | Node::Minus(l, r) => l.leaf_count() + r.leaf_count(),
        }
    }
}

impl BitAnd for Shape {
    type Output = Shape;

    fn bitand(self, rhs: Shape) -> Shape {
        self.and(rhs)
    }
}

impl BitOr for Shape {
    type Output = Shape;

    fn bitor(self, rhs: Shape) -> Shape {
        self.or(rhs)
    }
}

impl Sub for Shape {
    type Output = Shape;

    fn sub(self, rhs: Shape) -> Shape {
        self.minus(rhs)
    }
}

impl Not for Shape {
    type Output = Shape;

    fn not(self) -> Shape {
        self.complement()
    }
}
