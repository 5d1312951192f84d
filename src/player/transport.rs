use std::time::Duration;

use crate::catalog::Track;
use crate::error::Result;

/// Signals coming back from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// Periodic position update while playing.
    Position(Duration),
    /// The length of the current source became known.
    MetadataReady(Duration),
    /// The current source played to the end.
    Ended,
}

/// The single audio output the controller drives.
///
/// Commands are fire-and-forget except `play` and `seek`, which may be
/// rejected (missing source, undecodable audio, unseekable stream).
pub trait Transport {
    /// Point the transport at a new source. Nothing is loaded until `play`.
    fn set_source(&mut self, track: &Track);
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, position: Duration) -> Result<()>;
    fn set_volume(&mut self, volume: f32);
    /// Drain pending events.
    fn poll(&mut self) -> Vec<TransportEvent>;
    /// Stop output and drop the loaded source.
    fn release(&mut self);
}
