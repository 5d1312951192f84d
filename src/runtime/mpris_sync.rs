use crate::mpris::{MprisHandle, Status};
use crate::player::PlaybackState;

pub fn update_mpris(mpris: &MprisHandle, playback: &PlaybackState) {
    mpris.set_track_metadata(playback.current.as_ref(), playback.duration);
    mpris.set_status(Status::from_state(playback));
}
