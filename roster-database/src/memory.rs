use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::model::filter::Condition;
use crate::model::page::{PageRequest, PlayerOrder};
use crate::model::player::Player;

/// In-process player store used when no PostgreSQL URL is configured.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    writes: Arc<AtomicU64>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    players: BTreeMap<i64, Player>,
}

impl MemoryStore {
    pub async fn find_page(
        &self,
        conditions: &[Condition],
        order: PlayerOrder,
        page: PageRequest,
    ) -> Vec<Player> {
        let state = self.state.read().await;
        let mut matching: Vec<&Player> = state
            .players
            .values()
            .filter(|player| conditions.iter().all(|condition| condition.matches(player)))
            .collect();
        matching.sort_by(|left, right| order.compare(left, right));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        matching
            .into_iter()
            .skip(offset)
            .take(page.size() as usize)
            .cloned()
            .collect()
    }

    pub async fn count(&self, conditions: &[Condition]) -> u64 {
        let state = self.state.read().await;
        state
            .players
            .values()
            .filter(|player| conditions.iter().all(|condition| condition.matches(player)))
            .count() as u64
    }

    pub async fn find_by_id(&self, id: i64) -> Option<Player> {
        self.state.read().await.players.get(&id).cloned()
    }

    pub async fn insert(&self, player: &Player) -> Player {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = state.last_id;

        let mut stored = player.clone();
        stored.set_id(id);
        state.players.insert(id, stored.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);

        stored
    }

    /// Replace the record with the same id. Returns false when it does not exist.
    pub async fn replace(&self, id: i64, player: &Player) -> bool {
        let mut state = self.state.write().await;
        let Some(slot) = state.players.get_mut(&id) else {
            return false;
        };

        let mut stored = player.clone();
        stored.set_id(id);
        *slot = stored;
        self.writes.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub async fn delete(&self, id: i64) -> bool {
        let removed = self.state.write().await.players.remove(&id).is_some();
        if removed {
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    /// Number of successful mutations since the store was created.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}
