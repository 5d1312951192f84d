use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::lyrics::LyricLoader;
use crate::mpris::{ControlCmd, MprisHandle, Status};
use crate::player::{Controller, Direction, Transport};
use crate::runtime::keymap::{Action, action_for};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Track whose lyrics were last requested.
    pub lyrics_for: Option<u64>,
    /// Last (track, duration, status) published to MPRIS.
    pub last_mpris: Option<(Option<u64>, Option<Duration>, Status)>,
}

/// Main terminal event loop: handles input, UI drawing, controller ticks,
/// lyrics and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run<T: Transport>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller<T>,
    lyrics: &LyricLoader,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        controller.tick();

        // Keep the controller's queue in sync with the visible list.
        if app.queue_dirty {
            controller.load_queue(app.visible_tracks(controller.liked()));
            app.clear_queue_dirty();
        }

        sync_now_playing(app, controller, lyrics, state);

        while let Some(loaded) = lyrics.try_recv() {
            if !app.receive_lyrics(loaded) {
                debug!("dropped lyrics for a track that is no longer current");
            }
        }
        app.sync_lyrics(controller.state().position);

        let now = Instant::now();
        app.expire_toast(now);

        let playback = controller.state();
        let published = (
            playback.current_id(),
            playback.duration,
            Status::from_state(playback),
        );
        if state.last_mpris != Some(published) {
            update_mpris(mpris, playback);
            state.last_mpris = Some(published);
        }

        let display = app.display_indices(&playback.liked);
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                playback,
                &display,
                &settings.ui,
                &settings.controls,
                now,
            )
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, controller) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(action) = action_for(key, app.filter_mode) else {
                    continue;
                };
                if handle_action(action, settings, app, controller) {
                    return Ok(());
                }
            }
        }
    }
}

/// React to a track change: request its lyrics and move the cursor onto it
/// when following playback.
fn sync_now_playing<T: Transport>(
    app: &mut App,
    controller: &Controller<T>,
    lyrics: &LyricLoader,
    state: &mut EventLoopState,
) {
    let playback = controller.state();
    let Some(track) = playback.current.as_ref() else {
        return;
    };

    if state.lyrics_for != Some(track.id) {
        app.begin_lyrics(track.id);
        lyrics.request(track);
        state.lyrics_for = Some(track.id);
    }

    if app.follow_playback && !app.filter_mode {
        app.select_track_id(track.id, &playback.liked);
    }
}

fn play_selected<T: Transport>(app: &mut App, controller: &mut Controller<T>) {
    if app.display_indices(controller.liked()).is_empty() {
        return;
    }
    let Some(track) = app.selected_track().cloned() else {
        return;
    };
    app.follow_playback_on();
    controller.play(&track);
}

fn handle_control_cmd<T: Transport>(
    cmd: ControlCmd,
    app: &mut App,
    controller: &mut Controller<T>,
) -> bool {
    if !app.filter_mode {
        app.follow_playback_on();
    }
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if controller.state().current.is_none() {
                play_selected(app, controller);
            } else if !controller.state().is_playing {
                controller.toggle_playback();
            }
        }
        ControlCmd::Pause => {
            if controller.state().is_playing {
                controller.toggle_playback();
            }
        }
        ControlCmd::PlayPause => {
            if controller.state().current.is_none() {
                play_selected(app, controller);
            } else {
                controller.toggle_playback();
            }
        }
        ControlCmd::Stop => controller.stop(),
        ControlCmd::Next => controller.advance(Direction::Next),
        ControlCmd::Prev => controller.advance(Direction::Previous),
    }
    false
}

/// Apply a key action. Returns `true` when the app should quit.
fn handle_action<T: Transport>(
    action: Action,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller<T>,
) -> bool {
    let seek = settings.controls.seek_seconds as f64;
    let step = settings.controls.volume_step;

    match action {
        Action::Quit => return true,
        Action::TogglePlayback => controller.toggle_playback(),
        Action::Next => {
            app.follow_playback_on();
            controller.advance(Direction::Next);
        }
        Action::Previous => {
            app.follow_playback_on();
            controller.advance(Direction::Previous);
        }
        Action::SeekForward => controller.seek_by(seek),
        Action::SeekBackward => controller.seek_by(-seek),
        Action::VolumeUp => controller.change_volume(step),
        Action::VolumeDown => controller.change_volume(-step),
        Action::ToggleMute => controller.toggle_mute(),
        Action::PlaySelected => {
            app.exit_filter_mode();
            play_selected(app, controller);
        }
        Action::CursorDown => {
            app.follow_playback_off();
            app.next(controller.liked());
        }
        Action::CursorUp => {
            app.follow_playback_off();
            app.prev(controller.liked());
        }
        Action::CursorTop => {
            app.follow_playback_off();
            app.select_first(controller.liked());
        }
        Action::CursorBottom => {
            app.follow_playback_off();
            app.select_last(controller.liked());
        }
        Action::NextTab => {
            app.follow_playback_off();
            app.next_tab(controller.liked());
        }
        Action::ToggleShuffle => controller.toggle_shuffle(),
        Action::CycleRepeat => controller.cycle_repeat(),
        Action::ToggleLike => {
            // The current track, or the row under the cursor when there is none.
            let on_screen = app.display_indices(controller.liked()).contains(&app.selected);
            let target = controller
                .state()
                .current_id()
                .or_else(|| app.selected_track().map(|t| t.id).filter(|_| on_screen));
            if let Some(id) = target {
                let message = if controller.toggle_like(id) {
                    "Added to Favorites"
                } else {
                    "Removed from Favorites"
                };
                app.show_toast(message, Instant::now());
                app.liked_changed(controller.liked());
            }
        }
        Action::ToggleLyrics => app.toggle_lyrics(),
        Action::SearchStart => app.enter_filter_mode(),
        Action::SearchInput(c) => app.push_filter_char(c, controller.liked()),
        Action::SearchBackspace => app.pop_filter_char(controller.liked()),
        Action::SearchCancel => app.clear_filter(controller.liked()),
    }
    false
}
