use crate::{Id, Participant};
use alloc::boxed::Box;
use serde::Deserialize;

/// The caller on whose behalf an operation runs. Always passed explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Principal {
    /// No session, or a session the directory does not recognize.
    Anonymous,
    User(Id),
}

impl Principal {
    pub const fn as_user(&self) -> Option<Id> {
        if let Self::User(id) = *self {
            Some(id)
        } else {
            None
        }
    }
}

impl From<Option<Id>> for Principal {
    fn from(id: Option<Id>) -> Self {
        id.map_or(Self::Anonymous, Self::User)
    }
}

/// Directory entry as provisioned at start-up: a participant together with the session token that
/// authenticates them.
#[derive(Deserialize)]
pub struct Account {
    pub session: Box<str>,
    pub user: Participant,
}
