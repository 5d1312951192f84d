mod app;
mod catalog;
mod config;
mod error;
mod logging;
mod lyrics;
mod mpris;
mod player;
mod prefs;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
