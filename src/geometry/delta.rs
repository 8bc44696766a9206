//! Directional distance records.
//!
//! A [`Delta`] holds, for one mesh node, the signed distance to the conductor
//! surface along each of the six axis directions `(-x, +x, -y, +y, -z, +z)`
//! together with the voltage and conductor id seen in that direction.
//! Positive distances mean the node is outside, negative inside; a direction
//! without any surface carries `±LARGE_POS`.

use crate::math::{is_unbounded, Point3, Vector3, LARGE_POS, NEUMANN_FUZZ, SHELL_TOLERANCE};

/// Classification of a node after sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    /// Inside a conductor, held at its voltage.
    Interior,
    /// Cut cell with even `ix + iy + iz`.
    Even,
    /// Cut cell with odd `ix + iy + iz`.
    Odd,
    /// Irrelevant to the solver.
    Far,
}

impl Parity {
    /// Integer code used by the solver arrays.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Interior => -1,
            Self::Even => 0,
            Self::Odd => 1,
            Self::Far => 999,
        }
    }
}

/// Thresholds for [`Delta::classify`], in cell units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParityThresholds {
    /// Nodes deeper than this inside a conductor are dropped.
    pub dfill: f64,
    /// Distances below this count as inside.
    pub fuzz_outside: f64,
    /// Slack on the fill depth and on the one-cell cut test.
    pub fuzz_inside: f64,
    /// Cut cells must have some direction strictly within this many cells.
    pub cut_limit: f64,
}

impl ParityThresholds {
    /// Dirichlet thresholds.
    #[must_use]
    pub fn dirichlet(dfill: f64, fuzz_outside: f64, fuzz_inside: f64) -> Self {
        Self {
            dfill,
            fuzz_outside,
            fuzz_inside,
            cut_limit: 1.0 + fuzz_inside,
        }
    }

    /// Neumann thresholds: no fill, on-surface nodes stay cut cells and nodes
    /// exactly one cell away are ignored.
    #[must_use]
    pub fn neumann(fuzz_inside: f64) -> Self {
        Self {
            dfill: 0.0,
            fuzz_outside: 0.0,
            fuzz_inside,
            cut_limit: 1.0,
        }
    }
}

/// Six-direction distance record of one mesh node.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    /// Grid indices `(ix, iy, iz)`; `iz` is local to the rank's z range.
    pub index: [usize; 3],
    /// Physical coordinates of the node.
    pub position: Point3,
    /// Signed distances `(-x, +x, -y, +y, -z, +z)`.
    pub dels: [f64; 6],
    /// Voltage seen in each direction.
    pub volts: [f64; 6],
    /// Conductor id seen in each direction.
    pub ids: [i32; 6],
    /// Multigrid level the record was sampled on.
    pub level: usize,
    /// Classification, `Far` until [`Delta::classify`] runs.
    pub parity: Parity,
    /// Whether the surface imposes a Neumann condition.
    pub neumann: bool,
    normalized: bool,
}

impl Delta {
    /// Creates a record with a single voltage and conductor id.
    #[must_use]
    pub fn new(
        index: [usize; 3],
        position: Point3,
        dels: [f64; 6],
        voltage: f64,
        condid: i32,
        neumann: bool,
    ) -> Self {
        Self {
            index,
            position,
            dels,
            volts: [voltage; 6],
            ids: [condid; 6],
            level: 0,
            parity: Parity::Far,
            neumann,
            normalized: false,
        }
    }

    /// Intersection: per direction the larger distance wins, ties keep `self`.
    #[must_use]
    pub fn and(mut self, rhs: &Delta) -> Delta {
        for i in 0..6 {
            if self.dels[i] < rhs.dels[i] {
                self.take(i, rhs);
            }
        }
        self.neumann = rhs.neumann;
        self
    }

    /// Union: per direction the smaller distance wins, ties keep `self`.
    #[must_use]
    pub fn or(mut self, rhs: &Delta) -> Delta {
        for i in 0..6 {
            if self.dels[i] > rhs.dels[i] {
                self.take(i, rhs);
            }
        }
        self.neumann = rhs.neumann;
        self
    }

    /// Complement: every distance changes sign.
    #[must_use]
    pub fn not(mut self) -> Delta {
        for d in &mut self.dels {
            *d = -*d;
        }
        self
    }

    /// Difference: intersection with the complement of `rhs`, with shared
    /// boundaries pushed out to the far sentinel.
    #[must_use]
    pub fn minus(self, rhs: &Delta) -> Delta {
        let left = self.dels;
        let mut out = self.and(&rhs.clone().not());
        for i in 0..6 {
            if (left[i] - rhs.dels[i]).abs() < SHELL_TOLERANCE {
                out.dels[i] = LARGE_POS;
            }
        }
        out
    }

    fn take(&mut self, i: usize, rhs: &Delta) {
        self.dels[i] = rhs.dels[i];
        self.volts[i] = rhs.volts[i];
        self.ids[i] = rhs.ids[i];
    }

    /// Whether distances are already in cell units.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Converts distances to cell units. Calling it again is a no-op.
    ///
    /// Neumann records also get their near-boundary values snapped so that
    /// nodes on the surface survive as cut cells.
    pub fn normalize(&mut self, spacing: &Vector3) {
        if self.normalized {
            return;
        }
        for k in 0..3 {
            for d in &mut self.dels[2 * k..2 * k + 2] {
                if !is_unbounded(*d) {
                    *d /= spacing[k];
                }
            }
        }
        if self.neumann {
            self.fix_neumann();
        }
        self.normalized = true;
    }

    fn fix_neumann(&mut self) {
        let fuzz = NEUMANN_FUZZ;
        let dels = &mut self.dels;

        // A tiny negative distance means the node sits on the surface.
        for (i0, i1) in [(0, 1), (1, 0), (2, 3), (3, 2), (4, 5), (5, 4)] {
            if -fuzz < dels[i1] && dels[i1] < 0.0 {
                dels[i0] = 0.0;
                dels[i1] = -2.0;
            }
        }

        for d in dels.iter_mut() {
            if 1.0 - fuzz < *d && *d < 1.0 {
                *d = 1.0;
            }
        }

        let min = dels.iter().copied().fold(f64::INFINITY, f64::min);
        let max = dels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min < 0.0 && max > 0.0 {
            for d in dels.iter_mut() {
                if *d > 0.0 {
                    *d = -2.0;
                }
            }
        }

        let min_abs = dels.iter().map(|d| d.abs()).fold(f64::INFINITY, f64::min);
        if min_abs == 0.0 {
            for d in dels.iter_mut() {
                if -1.0 + fuzz < *d && *d < 0.0 {
                    *d = -2.0;
                }
            }
        }
    }

    /// Classifies the node and stores the result in `parity`.
    ///
    /// Distances must be normalized. A node is inside when every distance is
    /// below `fuzz_outside`; inside nodes within `dfill` cells of the surface
    /// are interior. Other nodes with a surface closer than one cell in some
    /// direction are cut cells, split by the parity of `ix + iy + iz`.
    pub fn classify(&mut self, thresholds: &ParityThresholds) -> Parity {
        let max = self.dels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_abs = self.dels.iter().map(|d| d.abs()).fold(f64::INFINITY, f64::min);

        self.parity = if max < thresholds.fuzz_outside {
            if min_abs <= thresholds.dfill + thresholds.fuzz_inside {
                Parity::Interior
            } else {
                Parity::Far
            }
        } else if min_abs < thresholds.cut_limit {
            if (self.index[0] + self.index[1] + self.index[2]) % 2 == 0 {
                Parity::Even
            } else {
                Parity::Odd
            }
        } else {
            Parity::Far
        };
        self.parity
    }

    /// Returns true if the record carries no information for the solver.
    #[must_use]
    pub fn is_far(&self) -> bool {
        self.parity == Parity::Far
    }
}
