pub mod error;
pub mod service;

pub use error::{PlayerError, Rejected};
pub use service::PlayerService;

use roster_database::Database;

/// Shared state handed to every request handler.
#[derive(Clone, Debug)]
pub struct Data {
    pub players: PlayerService,
}

impl Data {
    pub fn new(db: Database) -> Self {
        Self {
            players: PlayerService::new(db),
        }
    }
}
