use crate::math::{Point, Real};
use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up or stepping an immersed-boundary simulation.
///
/// Every variant is fatal: a simulation that produced one of them must not keep running,
/// since continuing would silently break momentum conservation between the bodies and the fluid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A configuration parameter is out of its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// More bodies or markers were requested than the configured capacity allows.
    #[error("capacity exceeded: requested {requested} {what}, capacity is {capacity}")]
    CapacityExceeded {
        /// What kind of object overflowed (`"bodies"` or `"markers"`).
        what: &'static str,
        /// Number of objects requested. When counting stopped early, a lower bound of it.
        requested: usize,
        /// Maximum number of objects allowed.
        capacity: usize,
    },

    /// A movable body has a non-positive mass.
    #[error("movable body has a non-positive mass ({0})")]
    NonPositiveMass(Real),

    /// A movable body has a non-positive principal moment of inertia.
    #[error("movable body has a non-positive moment of inertia ({0})")]
    NonPositiveInertia(Real),

    /// The interpolation/spread stencil of a marker does not fit inside the lattice.
    #[error("stencil of marker {marker} of body {body} at {position} leaves the lattice")]
    StencilOutOfBounds {
        /// Index of the body owning the marker.
        body: usize,
        /// Global index of the marker.
        marker: usize,
        /// Position of the marker.
        position: Point<Real>,
    },

    /// A marker position is NaN or infinite.
    #[error("marker {marker} of body {body} has a non-finite position")]
    NonFinitePosition {
        /// Index of the body owning the marker.
        body: usize,
        /// Global index of the marker.
        marker: usize,
    },

    /// A lattice-sized buffer does not match the lattice extents.
    #[error("lattice buffer has {found} nodes, expected {expected}")]
    LatticeMismatch {
        /// Number of lattice nodes.
        expected: usize,
        /// Number of entries found in the buffer.
        found: usize,
    },

    /// No body is attached to this handle.
    #[error("unknown body handle {0}")]
    UnknownBody(usize),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
