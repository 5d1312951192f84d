//! Playback: the controller that owns playback state, the queue selector it
//! delegates next/previous to, and the audio transport it drives.

mod controller;
mod rodio_transport;
mod selector;
mod state;
mod transport;

pub use controller::{Controller, ControllerOptions};
pub use rodio_transport::RodioTransport;
pub use selector::{next_index, previous_index};
pub use state::{Direction, PlaybackState, RepeatMode};
pub use transport::{Transport, TransportEvent};
