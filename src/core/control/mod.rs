//! OS control surfaces: power transitions and media transport.

pub mod media;
pub mod power;

pub use media::{MediaAction, MediaActuator, MediaStatus, PlaybackState};
pub use power::{PowerAction, PowerActuator};
