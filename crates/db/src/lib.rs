pub mod error;

mod collection;

use core::sync::atomic::{AtomicU64, Ordering};
use dashmap::DashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;

pub use collection::Collection;
pub use model::{Account, Answer, Group, Id, Participant, Question, Quiz};

/// Default number of change events buffered per subscriber before it starts lagging.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Identifies the collection touched by a committed write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Change {
    Users,
    Groups,
    Quizzes,
    Questions,
    Answers,
}

/// In-memory document store holding the identity directory and every domain collection.
pub struct Database {
    counter: AtomicU64,
    feed: broadcast::Sender<Change>,
    sessions: DashMap<Box<str>, Id>,
    users: Collection<Id, Participant>,
    groups: Collection<Id, Group>,
    quizzes: Collection<Id, Quiz>,
    questions: Collection<Id, Question>,
    /// Keyed by `(question, user)`.
    answers: Collection<(Id, Id), Answer>,
}

impl Default for Database {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Database {
    pub fn with_capacity(capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(capacity);
        Self {
            counter: AtomicU64::new(0),
            sessions: DashMap::new(),
            users: Collection::new(Change::Users, feed.clone()),
            groups: Collection::new(Change::Groups, feed.clone()),
            quizzes: Collection::new(Change::Quizzes, feed.clone()),
            questions: Collection::new(Change::Questions, feed.clone()),
            answers: Collection::new(Change::Answers, feed.clone()),
            feed,
        }
    }

    /// Allocates a fresh identifier.
    pub fn next_id(&self) -> Id {
        let secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        let secs = u32::try_from(secs).unwrap_or(u32::MAX);
        Id::new(secs, self.counter.fetch_add(1, Ordering::Relaxed))
    }

    /// Adds a provisioned account to the directory, replacing any participant with the same id.
    pub fn register(&self, Account { session, user }: Account) {
        let id = user.id;
        self.users.insert(id, user);
        if let Some(previous) = self.sessions.insert(session, id) {
            log::warn!("Session token of {previous} has been reassigned to {id}.");
        }
        log::info!("Registered participant {id}.");
    }

    /// Resolves a session token to the participant it authenticates.
    pub fn session(&self, token: &str) -> Option<Id> {
        self.sessions.get(token).map(|id| *id.value())
    }

    /// Opens a new receiver on the change feed. Only writes committed after this call are seen.
    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.feed.subscribe()
    }

    pub fn users(&self) -> &Collection<Id, Participant> {
        &self.users
    }

    pub fn groups(&self) -> &Collection<Id, Group> {
        &self.groups
    }

    pub fn quizzes(&self) -> &Collection<Id, Quiz> {
        &self.quizzes
    }

    pub fn questions(&self) -> &Collection<Id, Question> {
        &self.questions
    }

    pub fn answers(&self) -> &Collection<(Id, Id), Answer> {
        &self.answers
    }
}
