use json::JsonValue;
use log::debug;
use reqwest::blocking::Client;

use crate::error::{Error, Result};
use crate::game::Game;

pub const DEFAULT_API_BASE: &str = "http://api.steampowered.com";

const RESOLVE_VANITY_URL: &str = "ISteamUser/ResolveVanityURL/v0001";
const GET_OWNED_GAMES: &str = "IPlayerService/GetOwnedGames/v0001";

/// The two Steam Web API calls a library lookup needs.
pub trait SteamApi {
    /// Maps a vanity name to a 64-bit Steam ID.
    fn resolve_vanity_url(&self, vanity_name: &str) -> Result<String>;

    /// Returns the owned games of `steam_id`, in the order Steam lists them.
    fn owned_games(&self, steam_id: &str) -> Result<Vec<Game>>;
}

pub struct SteamClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl SteamClient {
    pub fn new(api_key: &str, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.trim().to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<JsonValue> {
        let url = format!("{}/{path}/", self.api_base);
        debug!("GET {url} {params:?}");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str()), ("format", "json")])
            .send()?
            .error_for_status()?;

        Ok(json::parse(&response.text()?)?)
    }
}

impl SteamApi for SteamClient {
    fn resolve_vanity_url(&self, vanity_name: &str) -> Result<String> {
        let body = self.get(RESOLVE_VANITY_URL, &[("vanityurl", vanity_name)])?;
        parse_resolved_id(vanity_name, &body)
    }

    fn owned_games(&self, steam_id: &str) -> Result<Vec<Game>> {
        let body = self.get(
            GET_OWNED_GAMES,
            &[("steamid", steam_id), ("include_appinfo", "1")],
        )?;
        parse_owned_games(&body)
    }
}

fn response_object(body: &JsonValue) -> Result<&JsonValue> {
    let response = &body["response"];
    if !response.is_object() {
        return Err(Error::Malformed("missing `response` object".to_string()));
    }
    Ok(response)
}

/// `{"response": {"steamid": "...", "success": 1}}`
///
/// Steam answers unknown names with `success: 42` and a `message` instead.
pub fn parse_resolved_id(vanity_name: &str, body: &JsonValue) -> Result<String> {
    let response = response_object(body)?;

    match response["success"].as_u8() {
        Some(1) => {}
        Some(_) => return Err(Error::NoMatch(vanity_name.to_string())),
        None => return Err(Error::Malformed("missing `success` flag".to_string())),
    }

    match response["steamid"].as_str() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(Error::Malformed("missing `steamid`".to_string())),
    }
}

/// `{"response": {"game_count": 2, "games": [...]}}`
///
/// Private profiles come back as `{"response": {}}`, which is an empty
/// library rather than an error.
pub fn parse_owned_games(body: &JsonValue) -> Result<Vec<Game>> {
    let response = response_object(body)?;
    let games = &response["games"];

    if games.is_null() {
        return Ok(Vec::new());
    }
    if !games.is_array() {
        return Err(Error::Malformed("`games` is not an array".to_string()));
    }

    games.members().map(Game::from_json).collect()
}
