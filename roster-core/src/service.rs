use roster_database::{
    Database, PageRequest, Player, PlayerFilter, PlayerOrder, impls::players,
};
use tracing::{debug, info};

use crate::error::{PlayerError, Rejected};

/// Player queries and commands: validation, not-found handling and persistence.
#[derive(Clone, Debug)]
pub struct PlayerService {
    db: Database,
}

impl PlayerService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Return one sorted page of players matching `filter`. An empty page is not an error.
    pub async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> Result<Vec<Player>, PlayerError> {
        let conditions = filter.conditions();
        let found = players::find_players(&self.db, &conditions, order, page).await?;

        debug!(
            conditions = conditions.len(),
            ?order,
            page_number = page.number(),
            page_size = page.size(),
            returned = found.len(),
            "players listed"
        );
        Ok(found)
    }

    pub async fn count(&self, filter: &PlayerFilter) -> Result<u64, PlayerError> {
        let conditions = filter.conditions();
        Ok(players::count_players(&self.db, &conditions).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Player, PlayerError> {
        let id = ensure_positive_id(id)?;
        players::find_player(&self.db, id)
            .await?
            .ok_or(PlayerError::NotFound(id))
    }

    /// Validate and persist a new player. On failure the input comes back
    /// alongside the error.
    pub async fn create(&self, mut player: Player) -> Result<Player, Rejected> {
        if let Err(error) = prepare_for_insert(&mut player) {
            info!(%error, "player creation rejected");
            return Err(Rejected {
                error: error.into(),
                input: player,
            });
        }

        match players::insert_player(&self.db, &player).await {
            Ok(stored) => {
                debug!(player_id = ?stored.id(), "player created");
                Ok(stored)
            }
            Err(error) => Err(Rejected {
                error: error.into(),
                input: player,
            }),
        }
    }

    /// Apply a partial update: fields present in `patch` overwrite, the rest
    /// are kept from the stored record. A patch with nothing set is a no-op.
    pub async fn update(&self, id: i64, mut patch: Player) -> Result<Player, PlayerError> {
        let id = ensure_positive_id(id)?;
        let existing = players::find_player(&self.db, id)
            .await?
            .ok_or(PlayerError::NotFound(id))?;

        if patch.is_entirely_unset() {
            debug!(player_id = id, "empty player update ignored");
            return Ok(existing);
        }

        patch.set_id(id);
        patch.merge_missing_from(&existing)?;

        if !players::replace_player(&self.db, id, &patch).await? {
            // Deleted between the read and the write.
            return Err(PlayerError::NotFound(id));
        }

        debug!(player_id = id, "player updated");
        Ok(patch)
    }

    pub async fn delete(&self, id: i64) -> Result<(), PlayerError> {
        let id = ensure_positive_id(id)?;
        if !players::delete_player(&self.db, id).await? {
            return Err(PlayerError::NotFound(id));
        }

        debug!(player_id = id, "player deleted");
        Ok(())
    }
}

fn ensure_positive_id(id: i64) -> Result<i64, PlayerError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(PlayerError::InvalidId(id))
    }
}

fn prepare_for_insert(player: &mut Player) -> Result<(), roster_database::ValidationError> {
    player.check_required_for_create()?;
    if player.banned().is_none() {
        player.set_banned(Some(false));
    }
    player.validate_all()
}
