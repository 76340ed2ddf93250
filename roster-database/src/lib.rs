pub mod database;
pub mod impls;
pub mod memory;
pub mod model;

pub use database::{Backend, Database, MIGRATOR};
pub use memory::MemoryStore;
pub use model::error::ValidationError;
pub use model::filter::{Condition, FilterParams, PlayerFilter};
pub use model::page::{PageParams, PageRequest, PlayerOrder};
pub use model::player::{Player, PlayerPayload};
pub use model::archetype::{Profession, Race};
