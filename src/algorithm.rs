//! Static table of the 32 operator routing algorithms.

use std::fmt;

use crate::operator::OperatorIndex;

// -------------------------------------------------------------------------------------------------

/// Number of operators in a routing matrix.
const OPS: usize = OperatorIndex::COUNT;

/// A 4x4 modulation routing matrix: `matrix[m][t]` is the weight of operator `m`'s output in
/// operator `t`'s phase modulation.
pub type AlgorithmMatrix = [[f32; OPS]; OPS];

// -------------------------------------------------------------------------------------------------

/// An FM algorithm: a named modulation topology with a mask of audible carrier operators.
///
/// Algorithms are static, read-only data. Use [`Algorithm::select`] to look one up by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Algorithm {
    id: usize,
    name: &'static str,
    matrix: AlgorithmMatrix,
    carriers: [bool; OPS],
}

impl Algorithm {
    /// Number of available algorithms.
    pub const COUNT: usize = 32;

    /// Id of the algorithm that is used for invalid ids.
    pub const DEFAULT_ID: usize = 0;

    const fn new(
        id: usize,
        name: &'static str,
        routes: &[(usize, usize, f32)],
        carriers: [bool; OPS],
    ) -> Self {
        let mut matrix = [[0.0; OPS]; OPS];
        let mut index = 0;
        while index < routes.len() {
            let (modulator, target, weight) = routes[index];
            matrix[modulator][target] = weight;
            index += 1;
        }
        Self {
            id,
            name,
            matrix,
            carriers,
        }
    }

    /// Look up an algorithm by its id. Ids outside of the table fall back to the default
    /// algorithm, where three modulators feed one carrier.
    pub fn select(id: usize) -> &'static Algorithm {
        ALGORITHMS
            .get(id)
            .unwrap_or(&ALGORITHMS[Self::DEFAULT_ID])
    }

    /// All available algorithms, ordered by id.
    pub fn all() -> &'static [Algorithm] {
        &ALGORITHMS
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The algorithm's modulation routing weights.
    pub fn matrix(&self) -> &AlgorithmMatrix {
        &self.matrix
    }

    /// Mask of operators which are summed into the audio output.
    pub fn carriers(&self) -> &[bool; OPS] {
        &self.carriers
    }

    /// Number of carrier operators.
    pub fn carrier_count(&self) -> usize {
        self.carriers.iter().filter(|c| **c).count()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02} {}", self.id + 1, self.name)
    }
}

// -------------------------------------------------------------------------------------------------

const X: bool = true;
const O: bool = false;

#[rustfmt::skip]
static ALGORITHMS: [Algorithm; Algorithm::COUNT] = [
    Algorithm::new(0, "Classic FM", &[(0, 3, 1.0), (1, 3, 1.0), (2, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(1, "Chain", &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(2, "Parallel Carriers", &[], [X, X, X, X]),
    Algorithm::new(3, "Dual Chains", &[(0, 1, 1.0), (2, 3, 1.0)], [O, X, O, X]),
    Algorithm::new(4, "Complex Modulation", &[(0, 2, 1.0), (1, 2, 1.0), (2, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(5, "Bell", &[(0, 1, 1.0), (2, 1, 1.0), (1, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(6, "Brass", &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(7, "Organ", &[(0, 1, 1.0)], [O, X, X, X]),
    Algorithm::new(8, "Metallic", &[(0, 2, 1.0), (1, 3, 1.0), (2, 3, 0.5)], [O, O, X, X]),
    Algorithm::new(9, "Chaos", &[(0, 1, 0.8), (1, 0, 0.3), (2, 3, 1.0)], [O, X, O, X]),
    Algorithm::new(10, "Double Modulation", &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(11, "Triple Carrier", &[(0, 1, 1.0)], [O, X, X, X]),
    Algorithm::new(12, "Stack Modulation", &[(0, 1, 1.0), (1, 2, 1.0), (0, 3, 1.0)], [O, O, X, X]),
    Algorithm::new(13, "Complex Web", &[(0, 2, 1.0), (1, 2, 1.0), (0, 3, 1.0), (2, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(14, "Feedback Chaos", &[(1, 0, 0.5), (0, 2, 1.0), (1, 3, 1.0)], [O, O, X, X]),
    Algorithm::new(15, "Bell Tower", &[(0, 1, 1.0), (2, 1, 1.0), (3, 1, 1.0)], [O, X, O, O]),
    Algorithm::new(16, "Dual Feedback", &[(0, 1, 1.0), (1, 0, 0.3), (2, 3, 1.0)], [O, X, O, X]),
    Algorithm::new(17, "Metallic Resonance", &[(0, 1, 1.0), (2, 1, 1.0), (1, 3, 1.0), (2, 3, 0.5)], [O, O, O, X]),
    Algorithm::new(18, "Simple Pair", &[(0, 1, 1.0)], [O, X, O, O]),
    Algorithm::new(19, "Digital Scream", &[(0, 1, 2.0), (1, 2, 1.5), (2, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(20, "Harmonic Cascade", &[(0, 3, 1.0), (1, 3, 0.8), (2, 3, 0.6)], [O, O, O, X]),
    Algorithm::new(21, "Cross Chaos", &[(0, 1, 1.0), (1, 0, 0.7), (2, 3, 1.0), (3, 2, 0.4)], [O, X, O, X]),
    Algorithm::new(22, "Frequency Shifter", &[(0, 2, 1.0), (1, 3, 1.0), (2, 3, 0.3)], [O, O, X, X]),
    Algorithm::new(23, "Ring Modulation", &[(0, 1, 1.0), (2, 3, 1.0), (1, 3, 0.5)], [O, O, O, X]),
    Algorithm::new(24, "Spectral Morph", &[(0, 1, 1.0), (0, 2, 0.7), (0, 3, 0.5)], [O, X, X, X]),
    Algorithm::new(25, "Noise Gate", &[(0, 1, 1.5), (2, 1, 0.8), (1, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(26, "Phase Distortion", &[(0, 1, 1.0), (1, 2, 1.0), (3, 2, 0.6)], [O, O, X, X]),
    Algorithm::new(27, "Frequency Folding", &[(0, 1, 2.5), (1, 2, 1.0), (2, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(28, "Digital Shimmer", &[(0, 3, 1.0), (1, 2, 1.0), (2, 3, 0.4)], [O, O, X, X]),
    Algorithm::new(29, "Chaos Matrix", &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 0.5), (0, 3, 1.0)], [O, O, O, X]),
    Algorithm::new(30, "Ultimate Chaos", &[(0, 1, 1.0), (1, 0, 0.6), (2, 3, 1.0), (3, 2, 0.4), (0, 3, 0.5)], [O, X, O, X]),
    Algorithm::new(31, "Pure Madness", &[
        (0, 1, 1.5), (1, 0, 0.8), (2, 3, 1.5), (3, 2, 0.7), (0, 2, 0.6), (1, 3, 0.4),
        (0, 0, 0.3), (1, 1, 0.3), (2, 2, 0.3), (3, 3, 0.3),
    ], [O, X, X, X]),
];

// -------------------------------------------------------------------------------------------------
