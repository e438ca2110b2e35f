use std::sync::Arc;

use crate::db::{DbPool, OrmConn};
use crate::ids::IdGenerator;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub ids: Arc<dyn IdGenerator>,
}
