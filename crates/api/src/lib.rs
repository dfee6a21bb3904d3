pub mod error;
pub mod guard;
pub mod rpc;
pub mod service;
pub mod subscription;

mod answer;
mod group;
mod question;
mod quiz;
mod user;

mod util {
    pub mod query;
    pub mod session;
}

#[cfg(test)]
mod fixture;

use db::Database;
use std::sync::Arc;

pub use model::Principal;

/// Entry point of every operation. Cheap to clone; all clones share one store.
#[derive(Clone)]
pub struct Classroom {
    db: Arc<Database>,
}

impl From<Database> for Classroom {
    fn from(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }
}

impl Classroom {
    pub fn database(&self) -> &Database {
        &self.db
    }
}
