//! Player registry: join/leave lifecycle, per-game target decks, and the
//! derived leaderboard.

use indexmap::IndexMap;
use rand::seq::{IndexedRandom, SliceRandom};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::{AppConfig, MAX_NAME_LEN},
    dto::game::LobbyPlayer,
};

/// Mutable record for one connected player.
#[derive(Debug, Clone)]
pub struct Player {
    /// Display name, normalized on join (trimmed, truncated, uppercased).
    pub name: String,
    /// Color tag assigned from the palette on join.
    pub color: String,
    /// Current score. Non-decreasing within a game.
    pub score: u32,
    /// Target label for the current round, if one has been dealt.
    pub target: Option<String>,
    /// Whether this player already scored in the current round.
    pub has_scored: bool,
    /// Remaining shuffled targets for the active game, consumed front to back.
    pub deck: Vec<String>,
}

impl Player {
    fn new(name: String, color: String) -> Self {
        Self {
            name,
            color,
            score: 0,
            target: None,
            has_scored: false,
            deck: Vec::new(),
        }
    }

    /// Deal the next target for this player.
    ///
    /// Pops the front of the deck while it lasts, which guarantees a player
    /// never sees the same target twice in one game. Once the deck is
    /// exhausted (more rounds than catalog entries, or a mid-game joiner with
    /// an empty deck) targets come from an unconstrained random catalog draw.
    ///
    /// Sole mutator of the deck; called once per player per round.
    pub fn deal_next(&mut self, catalog: &[String]) -> String {
        if self.deck.is_empty() {
            let mut rng = rand::rng();
            catalog
                .choose(&mut rng)
                .cloned()
                .unwrap_or_else(|| "bottle".into())
        } else {
            self.deck.remove(0)
        }
    }
}

/// Registry of connected players keyed by their connection id.
///
/// An `IndexMap` keeps join order, which doubles as the deterministic
/// tie-break for equal leaderboard scores.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: RwLock<IndexMap<Uuid, Player>>,
}

impl PlayerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player for a connection. Returns `false` without touching
    /// anything if the connection already has a player.
    pub async fn join(&self, id: Uuid, raw_name: &str, config: &AppConfig) -> bool {
        let name = normalize_name(raw_name);
        let mut players = self.players.write().await;
        if players.contains_key(&id) {
            return false;
        }
        players.insert(id, Player::new(name, config.random_color()));
        true
    }

    /// Remove a player. Returns `false` if the connection had none.
    pub async fn leave(&self, id: Uuid) -> bool {
        let mut players = self.players.write().await;
        // shift_remove keeps the join order of the remaining players intact.
        players.shift_remove(&id).is_some()
    }

    /// Run a closure with read access to the player map.
    pub async fn with_players<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&IndexMap<Uuid, Player>) -> R,
    {
        let players = self.players.read().await;
        f(&players)
    }

    /// Run a closure with write access to the player map.
    ///
    /// The lock is released when the closure returns; callers must not await
    /// inside it.
    pub async fn with_players_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut IndexMap<Uuid, Player>) -> R,
    {
        let mut players = self.players.write().await;
        f(&mut players)
    }

    /// Number of registered players.
    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    /// Whether the registry has no players.
    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }

    /// Reset every player for a fresh game: zero score, cleared round state,
    /// and a newly shuffled full-catalog deck.
    pub async fn reset_for_new_game(&self, catalog: &[String]) {
        let mut players = self.players.write().await;
        for player in players.values_mut() {
            player.score = 0;
            player.has_scored = false;
            player.target = None;
            let mut deck = catalog.to_vec();
            let mut rng = rand::rng();
            deck.shuffle(&mut rng);
            player.deck = deck;
        }
    }

    /// Clear per-game state on lobby return without touching identity,
    /// name, or color.
    pub async fn clear_for_lobby_return(&self) {
        let mut players = self.players.write().await;
        for player in players.values_mut() {
            player.score = 0;
            player.has_scored = false;
            player.deck.clear();
        }
    }

    /// Derive the leaderboard: score descending, ties in join order.
    pub async fn scoreboard(&self) -> Vec<LobbyPlayer> {
        let players = self.players.read().await;
        let mut board: Vec<LobbyPlayer> = players
            .values()
            .map(|player| LobbyPlayer {
                name: player.name.clone(),
                score: player.score,
                color: player.color.clone(),
            })
            .collect();
        // Stable sort: equal scores keep registry (join) order.
        board.sort_by(|a, b| b.score.cmp(&a.score));
        board
    }
}

/// Normalize a display name: trim, truncate to [`MAX_NAME_LEN`] characters,
/// uppercase. Empty input becomes `UNKNOWN`.
fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "UNKNOWN".into();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect::<String>().to_uppercase()
}
