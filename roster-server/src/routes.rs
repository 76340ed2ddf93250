use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use roster_core::Data;
use roster_database::{FilterParams, PageParams, Player, PlayerFilter, PlayerPayload};

use crate::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

/// Build the application router with player routes nested under `prefix`.
pub fn app(data: Data, prefix: &str) -> Router {
    let players = Router::new()
        .route("/players", get(list_players).post(create_player))
        .route("/players/count", get(count_players))
        .route(
            "/players/:id",
            get(get_player).post(update_player).delete(delete_player),
        )
        .with_state(data);

    if prefix.is_empty() {
        players
    } else {
        Router::new().nest(prefix, players)
    }
}

async fn list_players(
    State(data): State<Data>,
    filter: Result<Query<FilterParams>, QueryRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Player>>> {
    let filter = PlayerFilter::try_from(filter?.0)?;
    let (order, page) = page?.resolve()?;

    let players = data.players.list(&filter, order, page).await?;
    Ok(Json(players))
}

async fn count_players(
    State(data): State<Data>,
    filter: Result<Query<FilterParams>, QueryRejection>,
) -> ApiResult<Json<u64>> {
    let filter = PlayerFilter::try_from(filter?.0)?;
    Ok(Json(data.players.count(&filter).await?))
}

async fn create_player(
    State(data): State<Data>,
    body: Result<Json<PlayerPayload>, JsonRejection>,
) -> ApiResult<Json<Player>> {
    let player = decode_player(body?.0)?;
    Ok(Json(data.players.create(player).await?))
}

async fn get_player(
    State(data): State<Data>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Player>> {
    let Path(id) = id?;
    Ok(Json(data.players.get_by_id(id).await?))
}

async fn update_player(
    State(data): State<Data>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<PlayerPayload>, JsonRejection>,
) -> ApiResult<Json<Player>> {
    let Path(id) = id?;
    let patch = decode_player(body?.0)?;
    Ok(Json(data.players.update(id, patch).await?))
}

async fn delete_player(
    State(data): State<Data>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    data.players.delete(id).await?;
    Ok(())
}

fn decode_player(payload: PlayerPayload) -> ApiResult<Player> {
    Player::from_payload(payload.clone()).map_err(|error| ApiError::InvalidBody {
        error,
        input: payload,
    })
}
