pub mod archetype;
pub mod error;
pub mod filter;
pub mod leveling;
pub mod page;
pub mod player;
