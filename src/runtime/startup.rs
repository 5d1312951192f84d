use std::time::Duration;

use crate::app::App;
use crate::config;
use crate::player::{Controller, ControllerOptions, RepeatMode, Transport};

/// Playback defaults from config. Persisted preferences still win over
/// `default_volume` inside the controller.
pub fn controller_options(settings: &config::Settings) -> ControllerOptions {
    ControllerOptions {
        restart_threshold: Duration::from_secs(settings.controls.restart_threshold_secs),
        default_volume: settings.audio.default_volume,
        shuffle: settings.playback.shuffle,
        repeat: match settings.playback.repeat {
            config::RepeatModeSetting::Off => RepeatMode::Off,
            config::RepeatModeSetting::All => RepeatMode::All,
            config::RepeatModeSetting::One => RepeatMode::One,
        },
    }
}

/// Apply UI defaults and put the cursor on a restored track.
pub fn apply_ui_defaults<T: Transport>(
    app: &mut App,
    controller: &Controller<T>,
    settings: &config::Settings,
) {
    app.show_lyrics = settings.ui.show_lyrics;
    if let Some(id) = controller.state().current_id() {
        app.select_track_id(id, controller.liked());
    }
}
