use std::sync::Arc;

use crate::{
    auth::repo::{PgUserStore, UserStore},
    db::ConnectionProvider,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(db: ConnectionProvider) -> Self {
        Self::from_store(Arc::new(PgUserStore::new(db)))
    }

    pub fn from_store(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_store(Arc::new(crate::auth::memory::MemoryUserStore::default()))
    }
}
