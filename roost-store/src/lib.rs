//! Store adapters for the room collection: a Postgres implementation
//! keeping one JSONB document per room, and an in-memory implementation
//! with the same semantics for tests, plus pool lifecycle and
//! configuration loading.

pub mod app_config;
pub mod database;
pub mod memory;
pub mod room_repo;

pub use app_config::Config;
pub use database::DbClient;
pub use memory::MemoryRoomStore;
pub use room_repo::PgRoomRepository;
