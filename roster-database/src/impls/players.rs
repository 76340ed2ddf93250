use anyhow::Context as _;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::{
    database::{Backend, Database},
    model::{
        filter::Condition,
        page::{PageRequest, PlayerOrder},
        player::Player,
    },
};

const PLAYER_COLUMNS: &str =
    "id, name, title, race, profession, experience, level, until_next_level, birthday, banned";

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: i64,
    name: String,
    title: Option<String>,
    race: String,
    profession: String,
    experience: i32,
    level: i32,
    until_next_level: i32,
    birthday: NaiveDate,
    banned: bool,
}

/// Column values of a fully populated record, ready to bind.
struct PlayerColumns<'a> {
    name: &'a str,
    title: Option<&'a str>,
    race: &'static str,
    profession: &'static str,
    experience: i32,
    level: i32,
    until_next_level: i32,
    birthday: NaiveDate,
    banned: bool,
}

/// Return one sorted page of players satisfying every condition.
pub async fn find_players(
    db: &Database,
    conditions: &[Condition],
    order: PlayerOrder,
    page: PageRequest,
) -> anyhow::Result<Vec<Player>> {
    match db.backend() {
        Backend::Postgres(pool) => find_players_pg(pool, conditions, order, page).await,
        Backend::Memory(store) => Ok(store.find_page(conditions, order, page).await),
    }
}

/// Count players satisfying every condition.
pub async fn count_players(db: &Database, conditions: &[Condition]) -> anyhow::Result<u64> {
    match db.backend() {
        Backend::Postgres(pool) => {
            let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM player");
            push_conditions(&mut builder, conditions);

            let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
            u64::try_from(count).context("player count out of u64 range")
        }
        Backend::Memory(store) => Ok(store.count(conditions).await),
    }
}

pub async fn find_player(db: &Database, id: i64) -> anyhow::Result<Option<Player>> {
    match db.backend() {
        Backend::Postgres(pool) => {
            let row: Option<PlayerRow> = sqlx::query_as(&format!(
                "SELECT {PLAYER_COLUMNS} FROM player WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(pool)
            .await?;

            row.map(player_from_row).transpose()
        }
        Backend::Memory(store) => Ok(store.find_by_id(id).await),
    }
}

/// Insert a validated record and return it with its assigned id.
pub async fn insert_player(db: &Database, player: &Player) -> anyhow::Result<Player> {
    match db.backend() {
        Backend::Postgres(pool) => {
            let columns = player_columns(player)?;
            let row: PlayerRow = sqlx::query_as(&format!(
                "INSERT INTO player (name, title, race, profession, experience, level, until_next_level, birthday, banned)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 RETURNING {PLAYER_COLUMNS}"
            ))
            .bind(columns.name)
            .bind(columns.title)
            .bind(columns.race)
            .bind(columns.profession)
            .bind(columns.experience)
            .bind(columns.level)
            .bind(columns.until_next_level)
            .bind(columns.birthday)
            .bind(columns.banned)
            .fetch_one(pool)
            .await?;

            let stored = player_from_row(row)?;
            debug!(player_id = ?stored.id(), "player inserted");
            Ok(stored)
        }
        Backend::Memory(store) => Ok(store.insert(player).await),
    }
}

/// Overwrite every column of the record with the given id.
/// Returns false when no such record exists.
pub async fn replace_player(db: &Database, id: i64, player: &Player) -> anyhow::Result<bool> {
    match db.backend() {
        Backend::Postgres(pool) => {
            let columns = player_columns(player)?;
            let updated = sqlx::query(
                "UPDATE player
                 SET name = $1, title = $2, race = $3, profession = $4, experience = $5,
                     level = $6, until_next_level = $7, birthday = $8, banned = $9
                 WHERE id = $10",
            )
            .bind(columns.name)
            .bind(columns.title)
            .bind(columns.race)
            .bind(columns.profession)
            .bind(columns.experience)
            .bind(columns.level)
            .bind(columns.until_next_level)
            .bind(columns.birthday)
            .bind(columns.banned)
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();

            Ok(updated > 0)
        }
        Backend::Memory(store) => Ok(store.replace(id, player).await),
    }
}

/// Remove the record with the given id. Returns false when it did not exist.
pub async fn delete_player(db: &Database, id: i64) -> anyhow::Result<bool> {
    match db.backend() {
        Backend::Postgres(pool) => {
            let deleted = sqlx::query("DELETE FROM player WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
                .rows_affected();

            Ok(deleted > 0)
        }
        Backend::Memory(store) => Ok(store.delete(id).await),
    }
}

async fn find_players_pg(
    pool: &PgPool,
    conditions: &[Condition],
    order: PlayerOrder,
    page: PageRequest,
) -> anyhow::Result<Vec<Player>> {
    let limit = i64::from(page.size());
    let offset = i64::try_from(page.offset()).context("page offset out of i64 range")?;

    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {PLAYER_COLUMNS} FROM player"));
    push_conditions(&mut builder, conditions);
    builder.push(order_clause(order));
    builder.push(" LIMIT ").push_bind(limit);
    builder.push(" OFFSET ").push_bind(offset);

    let rows: Vec<PlayerRow> = builder.build_query_as().fetch_all(pool).await?;

    let mut players = Vec::with_capacity(rows.len());
    for row in rows {
        players.push(player_from_row(row)?);
    }
    Ok(players)
}

fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, conditions: &[Condition]) {
    builder.push(" WHERE TRUE");

    for condition in conditions {
        builder.push(" AND ");
        match condition {
            Condition::NameContains(pattern) => {
                builder
                    .push("strpos(name, ")
                    .push_bind(pattern.clone())
                    .push(") > 0");
            }
            Condition::TitleContains(pattern) => {
                builder
                    .push("strpos(title, ")
                    .push_bind(pattern.clone())
                    .push(") > 0");
            }
            Condition::RaceIs(race) => {
                builder.push("race = ").push_bind(race.as_str());
            }
            Condition::ProfessionIs(profession) => {
                builder.push("profession = ").push_bind(profession.as_str());
            }
            Condition::BannedIs(banned) => {
                builder.push("banned = ").push_bind(*banned);
            }
            Condition::BornAtOrAfter(millis) => {
                builder.push(BIRTHDAY_MILLIS).push(" >= ").push_bind(*millis);
            }
            Condition::BornAtOrBefore(millis) => {
                builder.push(BIRTHDAY_MILLIS).push(" <= ").push_bind(*millis);
            }
            Condition::ExperienceAtLeast(min) => {
                builder.push("experience >= ").push_bind(*min);
            }
            Condition::ExperienceAtMost(max) => {
                builder.push("experience <= ").push_bind(*max);
            }
            Condition::LevelAtLeast(min) => {
                builder.push("level >= ").push_bind(*min);
            }
            Condition::LevelAtMost(max) => {
                builder.push("level <= ").push_bind(*max);
            }
        }
    }
}

/// Birthday as unix milliseconds of UTC midnight, comparable with timestamp criteria.
const BIRTHDAY_MILLIS: &str = "(EXTRACT(EPOCH FROM birthday::TIMESTAMP) * 1000)::BIGINT";

fn order_clause(order: PlayerOrder) -> String {
    match order {
        PlayerOrder::Id => " ORDER BY id ASC".to_owned(),
        // Byte-wise collation so the order matches the memory backend.
        PlayerOrder::Name => " ORDER BY name COLLATE \"C\" ASC, id ASC".to_owned(),
        other => format!(" ORDER BY {} ASC, id ASC", other.column()),
    }
}

fn player_columns(player: &Player) -> anyhow::Result<PlayerColumns<'_>> {
    Ok(PlayerColumns {
        name: player.name().context("player name missing")?,
        title: player.title(),
        race: player.race().context("player race missing")?.as_str(),
        profession: player
            .profession()
            .context("player profession missing")?
            .as_str(),
        experience: player.experience().context("player experience missing")?,
        level: player.level().context("player level missing")?,
        until_next_level: player
            .until_next_level()
            .context("player until_next_level missing")?,
        birthday: player.birthday().context("player birthday missing")?,
        banned: player.banned().unwrap_or(false),
    })
}

fn player_from_row(row: PlayerRow) -> anyhow::Result<Player> {
    let mut player = Player::new(
        &row.name,
        row.title.as_deref(),
        row.race.parse().context("player row has unknown race")?,
        row.profession
            .parse()
            .context("player row has unknown profession")?,
        row.experience,
        row.birthday,
        row.banned,
    )
    .with_context(|| format!("player row {} failed validation", row.id))?;
    player.set_id(row.id);

    if player.level() != Some(row.level) || player.until_next_level() != Some(row.until_next_level)
    {
        debug!(
            player_id = row.id,
            stored_level = row.level,
            stored_until_next_level = row.until_next_level,
            "stored level fields disagree with experience; using recomputed values"
        );
    }

    Ok(player)
}
