use std::sync::Arc;

use roost_core::RoomRepository;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<dyn RoomRepository>,
    pub auth: AuthConfig,
}
