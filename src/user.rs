use crate::game::Game;

pub struct User {
    pub steam_name: String,
    pub steam_id: String,
    pub games: Vec<Game>,
}

impl User {
    /// Games are kept sorted by playtime, most played first.
    pub fn new(steam_name: &str, steam_id: &str, mut games: Vec<Game>) -> Self {
        sort_by_playtime(&mut games);

        Self {
            steam_name: steam_name.to_string(),
            steam_id: steam_id.to_string(),
            games,
        }
    }

    pub fn total_playtime_hours(&self) -> String {
        let minutes: u64 = self.games.iter().map(|g| u64::from(g.playtime_forever)).sum();
        format!("{:.1}", minutes as f64 / 60.0)
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.steam_name, self.steam_id)
    }
}

/// Stable: games with equal playtime keep the order Steam sent them in.
pub fn sort_by_playtime(games: &mut [Game]) {
    games.sort_by(|a, b| b.playtime_forever.cmp(&a.playtime_forever));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(games: &[Game]) -> Vec<&str> {
        games.iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn most_played_first() {
        let mut games = vec![
            Game::new("Half-Life".into(), 70, 30),
            Game::new("Dota 2".into(), 570, 90_000),
            Game::new("Portal".into(), 400, 600),
        ];

        sort_by_playtime(&mut games);

        assert_eq!(names(&games), ["Dota 2", "Portal", "Half-Life"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut games = vec![
            Game::new("b".into(), 2, 10),
            Game::new("a".into(), 1, 10),
            Game::new("top".into(), 3, 11),
            Game::new("c".into(), 4, 10),
            Game::new("never".into(), 5, 0),
        ];

        sort_by_playtime(&mut games);

        assert_eq!(names(&games), ["top", "b", "a", "c", "never"]);
    }

    #[test]
    fn sorting_is_total() {
        let mut games: Vec<Game> = [7, 0, u32::MAX, 7, 3, 0]
            .into_iter()
            .enumerate()
            .map(|(i, playtime)| Game::new(i.to_string(), i as u32, playtime))
            .collect();

        sort_by_playtime(&mut games);

        assert_eq!(games.len(), 6);
        assert!(games
            .windows(2)
            .all(|w| w[0].playtime_forever >= w[1].playtime_forever));
    }

    #[test]
    fn new_user_sorts_library() {
        let user = User::new(
            "gaben",
            "76561197960287930",
            vec![Game::new("a".into(), 1, 60), Game::new("b".into(), 2, 120)],
        );

        assert_eq!(names(&user.games), ["b", "a"]);
        assert_eq!(user.total_playtime_hours(), "3.0");
        assert_eq!(user.to_string(), "gaben (76561197960287930)");
    }
}
