use log::{info, warn};

use crate::cache::IdCache;
use crate::error::Result;
use crate::steam_api::SteamApi;
use crate::user::User;

/// Cached IDs skip the ResolveVanityURL round trip. The cache never fails a
/// lookup: read errors count as a miss and write errors are only logged.
pub fn resolve_steam_id(api: &dyn SteamApi, cache: &dyn IdCache, steam_name: &str) -> Result<String> {
    match cache.lookup(steam_name) {
        Ok(Some(steam_id)) => {
            info!("SteamID for {steam_name} found in cache: {steam_id}");
            return Ok(steam_id);
        }
        Ok(None) => info!("SteamID for {steam_name} not cached. Querying..."),
        Err(e) => warn!("Cache read for {steam_name} failed, querying instead: {e}"),
    }

    let steam_id = api.resolve_vanity_url(steam_name)?;
    info!("Resolved {steam_name} to {steam_id}");

    if let Err(e) = cache.store(steam_name, &steam_id) {
        warn!("Could not cache SteamID for {steam_name}: {e}");
    }

    Ok(steam_id)
}

pub fn load_user(api: &dyn SteamApi, cache: &dyn IdCache, steam_name: &str) -> Result<User> {
    let steam_id = resolve_steam_id(api, cache, steam_name)?;
    let games = api.owned_games(&steam_id)?;
    let user = User::new(steam_name, &steam_id, games);

    info!("{user} owns {} games", user.games.len());
    Ok(user)
}
