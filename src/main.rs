// !! Critical knowledge !!
//
// Steam only refreshes playtime_forever when a game session ends, and every
// 30 minutes while one is active. A library fetched mid-session lags behind.

use std::sync::Arc;

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use config::Settings;
use server::AppState;
use steam_api::SteamClient;

mod cache;
mod cli;
mod config;
mod error;
mod game;
mod library;
mod server;
mod steam_api;
mod user;
mod view;

fn main() {
    let matches = cli::build_command().get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .ok();

    let settings = match Settings::load(&matches) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    let cache = match cache::open(settings.cache_kind, &settings.cache_path) {
        Ok(cache) => cache,
        Err(e) => {
            error!("Failed to open cache at {}: {e}", settings.cache_path.display());
            return;
        }
    };

    if let Some(steam_name) = matches.get_one::<String>("user") {
        print_library(&settings, cache.as_ref(), steam_name.trim());
        return;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {e}");
            return;
        }
    };

    info!("Caching SteamIDs with {:?}", settings.cache_kind);
    let state = AppState {
        settings: Arc::new(settings),
        cache,
    };
    if let Err(e) = runtime.block_on(server::serve(state)) {
        error!("Server stopped: {e}");
    }
}

fn print_library(settings: &Settings, cache: &dyn cache::IdCache, steam_name: &str) {
    let steam = SteamClient::new(&settings.api_key, &settings.api_base);

    let user = match library::load_user(&steam, cache, steam_name) {
        Ok(user) => user,
        Err(e) => {
            error!("Could not load library for {steam_name}: {e}");
            return;
        }
    };

    println!("{user}: {} games, {} h total", user.games.len(), user.total_playtime_hours());
    for game in &user.games {
        println!("{:>10} h  {}", game.playtime_hours(), game.name);
    }
}
