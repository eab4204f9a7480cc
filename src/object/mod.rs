//! Rigid bodies and the markers sampling their surface.

pub use self::body::{Body, BodyDesc, BodyHandle};
pub use self::body_set::BodySet;
pub use self::markers::{MarkerSample, MarkerSet};

mod body;
mod body_set;
mod markers;
