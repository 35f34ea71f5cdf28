use json::JsonValue;

use crate::error::{Error, Result};

const MEDIA_URL: &str = "http://media.steampowered.com/steamcommunity/public/images/apps";
const PLACEHOLDER_LOGO_URL: &str =
    "http://digilite.ca/wp-content/uploads/2013/07/squarespace-184x69.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub name: String,
    pub app_id: u32,
    /// Minutes.
    pub playtime_forever: u32,
    pub img_logo_url: String,
    pub img_icon_url: String,
    pub has_community_visible_stats: bool,
}

impl Game {
    pub const fn new(name: String, app_id: u32, playtime_forever: u32) -> Self {
        Self {
            name,
            app_id,
            playtime_forever,
            img_logo_url: String::new(),
            img_icon_url: String::new(),
            has_community_visible_stats: false,
        }
    }

    /// Builds a game from one entry of `response.games`.
    ///
    /// `appid`, `name` and `playtime_forever` are required; the image
    /// fragments and the stats flag are not sent for every title.
    pub fn from_json(entry: &JsonValue) -> Result<Self> {
        let app_id = entry["appid"]
            .as_u32()
            .ok_or_else(|| Error::Malformed("game entry without `appid`".to_string()))?;

        let name = entry["name"]
            .as_str()
            .ok_or_else(|| Error::Malformed(format!("game {app_id} has no `name`")))?
            .to_string();

        let playtime_forever = entry["playtime_forever"].as_u32().ok_or_else(|| {
            Error::Malformed(format!("game {app_id} has no `playtime_forever`"))
        })?;

        Ok(Self {
            img_logo_url: entry["img_logo_url"].as_str().unwrap_or_default().to_string(),
            img_icon_url: entry["img_icon_url"].as_str().unwrap_or_default().to_string(),
            has_community_visible_stats: entry["has_community_visible_stats"]
                .as_bool()
                .unwrap_or(false),
            ..Self::new(name, app_id, playtime_forever)
        })
    }

    pub fn logo_url(&self) -> String {
        if self.app_id == 0 || self.img_logo_url.is_empty() {
            return PLACEHOLDER_LOGO_URL.to_string();
        }

        format!("{MEDIA_URL}/{}/{}.jpg", self.app_id, self.img_logo_url)
    }

    pub fn icon_url(&self) -> Option<String> {
        if self.app_id == 0 || self.img_icon_url.is_empty() {
            return None;
        }

        Some(format!("{MEDIA_URL}/{}/{}.jpg", self.app_id, self.img_icon_url))
    }

    pub fn playtime_hours(&self) -> String {
        format!("{:.1}", f64::from(self.playtime_forever) / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_entry() {
        let entry = json::parse(
            r#"{
                "appid": 620,
                "name": "Portal 2",
                "playtime_forever": 1234,
                "img_icon_url": "2e478fc6874d06ae5baf0d147f6f21203291aa02",
                "img_logo_url": "d2a1119ddc202fab81d9b87048f495cbd6377502",
                "has_community_visible_stats": true
            }"#,
        )
        .unwrap();

        let game = Game::from_json(&entry).unwrap();

        assert_eq!(game.app_id, 620);
        assert_eq!(game.name, "Portal 2");
        assert_eq!(game.playtime_forever, 1234);
        assert!(game.has_community_visible_stats);
        assert_eq!(
            game.logo_url(),
            "http://media.steampowered.com/steamcommunity/public/images/apps/620/d2a1119ddc202fab81d9b87048f495cbd6377502.jpg"
        );
    }

    #[test]
    fn optional_fields_default() {
        let entry = json::parse(r#"{"appid": 10, "name": "Counter-Strike", "playtime_forever": 0}"#)
            .unwrap();

        let game = Game::from_json(&entry).unwrap();

        assert!(!game.has_community_visible_stats);
        assert_eq!(game.icon_url(), None);
        assert_eq!(game.logo_url(), PLACEHOLDER_LOGO_URL);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        for body in [
            r#"{"name": "No id", "playtime_forever": 5}"#,
            r#"{"appid": 10, "playtime_forever": 5}"#,
            r#"{"appid": 10, "name": "No playtime"}"#,
            r#"{"appid": "10", "name": "String id", "playtime_forever": 5}"#,
        ] {
            let entry = json::parse(body).unwrap();
            assert!(
                matches!(Game::from_json(&entry), Err(Error::Malformed(_))),
                "{body} should be rejected"
            );
        }
    }

    #[test]
    fn playtime_in_hours() {
        assert_eq!(Game::new("A".into(), 1, 90).playtime_hours(), "1.5");
        assert_eq!(Game::new("B".into(), 2, 0).playtime_hours(), "0.0");
    }
}
