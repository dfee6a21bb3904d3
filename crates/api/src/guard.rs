//! Precondition checks run before every mutation.
//!
//! Each operation runs a fixed sequence of these checks and reports the first one that fails.
//! Checks only read the current state of the store; the subsequent write re-checks ownership or
//! membership in its own filter.

use crate::error::{Error, Kind, Result};
use db::Database;
use model::{Group, Id, Owned, Participant, Principal, Question, Quiz, Role, Timestamp};

/// Records that can be looked up by id for an existence check.
pub trait Resource: Owned + Sized {
    const KIND: Kind;

    fn fetch(db: &Database, id: &Id) -> Option<Self>;
}

impl Resource for Participant {
    const KIND: Kind = Kind::User;

    fn fetch(db: &Database, id: &Id) -> Option<Self> {
        db.users().get(id)
    }
}

impl Resource for Group {
    const KIND: Kind = Kind::Group;

    fn fetch(db: &Database, id: &Id) -> Option<Self> {
        db.groups().get(id)
    }
}

impl Resource for Quiz {
    const KIND: Kind = Kind::Quiz;

    fn fetch(db: &Database, id: &Id) -> Option<Self> {
        db.quizzes().get(id)
    }
}

impl Resource for Question {
    const KIND: Kind = Kind::Question;

    fn fetch(db: &Database, id: &Id) -> Option<Self> {
        db.questions().get(id)
    }
}

/// An authenticated caller, bound to their directory entry as it was when authenticated.
pub struct Guard<'db> {
    db: &'db Database,
    user: Participant,
}

impl<'db> Guard<'db> {
    pub fn authenticate(db: &'db Database, principal: &Principal) -> Result<Self> {
        let Some(id) = principal.as_user() else {
            log::debug!("Anonymous caller denied.");
            return Err(Error::NotAuthorized);
        };
        let Some(user) = db.users().get(&id) else {
            log::debug!("Participant {id} is not in the directory.");
            return Err(Error::NotAuthorized);
        };
        Ok(Self { db, user })
    }

    /// Logged in, then verified, then holding the professor role.
    pub fn professor(db: &'db Database, principal: &Principal) -> Result<Self> {
        let guard = Self::authenticate(db, principal)?;
        guard.verified()?;
        guard.role(Role::Professor)?;
        Ok(guard)
    }

    pub fn user(&self) -> &Participant {
        &self.user
    }

    pub fn id(&self) -> Id {
        self.user.id
    }

    pub fn verified(&self) -> Result<()> {
        if self.user.verified {
            return Ok(());
        }
        log::debug!("Participant {} is not verified.", self.user.id);
        Err(Error::NotAuthorized)
    }

    pub fn role(&self, role: Role) -> Result<()> {
        if self.user.has_role(role) {
            return Ok(());
        }
        log::debug!("Participant {} lacks the {role:?} role.", self.user.id);
        Err(Error::NotAuthorized)
    }

    /// Fetches the record, failing if it does not exist.
    pub fn exists<T: Resource>(&self, id: &Id) -> Result<T> {
        T::fetch(self.db, id).ok_or(Error::ResourceNotFound(T::KIND))
    }

    pub fn owns<T: Owned>(&self, record: &T) -> Result<()> {
        if record.owner() == self.user.id {
            return Ok(());
        }
        log::debug!("Participant {} does not own a record of {}.", self.user.id, record.owner());
        Err(Error::NotAuthorized)
    }

    /// The record describes the caller, or the caller is an administrator.
    pub fn self_or_admin(&self, user: &Participant) -> Result<()> {
        self.owns(user).or_else(|_| self.role(Role::Admin))
    }

    pub fn member_of(&self, group: &Id) -> Result<()> {
        self.enrolled(&self.user, group)
    }

    pub fn not_member_of(&self, group: &Id) -> Result<()> {
        if self.user.is_member_of(group) {
            return Err(Error::AlreadyInGroup);
        }
        Ok(())
    }

    /// Membership check for an arbitrary participant.
    pub fn enrolled(&self, user: &Participant, group: &Id) -> Result<()> {
        if user.is_member_of(group) {
            return Ok(());
        }
        Err(Error::NotInGroup)
    }

    pub fn active(&self, question: &Question) -> Result<()> {
        if question.active {
            return Ok(());
        }
        Err(Error::QuestionInactive)
    }

    /// Returns the selection as an index into the question's possible answers.
    pub fn answer_in_range(&self, question: &Question, selected: i64) -> Result<usize> {
        question.choice(selected).ok_or(Error::AnswerOutOfRange)
    }

    pub fn within_window(&self, question: &Question, timestamp: Timestamp) -> Result<()> {
        if question.accepts(timestamp) {
            return Ok(());
        }
        Err(Error::AnswerOutOfTime)
    }
}

#[cfg(test)]
mod tests {
    use super::Guard;
    use crate::{
        error::{Error, Kind},
        fixture::Fixture,
    };
    use model::{Group, Id, Participant, Principal, Question, Role};

    #[test]
    fn rejects_anonymous_and_unknown_callers() {
        let fx = Fixture::new();
        let db = fx.classroom.database();
        assert_eq!(Guard::authenticate(db, &Principal::Anonymous).err(), Some(Error::NotAuthorized));
        let stranger = Principal::User(Id::new(0, u64::MAX));
        assert_eq!(Guard::authenticate(db, &stranger).err(), Some(Error::NotAuthorized));
    }

    #[test]
    fn identity_and_role_checks() {
        let fx = Fixture::new();
        let db = fx.classroom.database();

        let guard = Guard::authenticate(db, &fx.unverified).unwrap();
        assert_eq!(guard.verified(), Err(Error::NotAuthorized));

        let guard = Guard::authenticate(db, &fx.student).unwrap();
        assert_eq!(guard.verified(), Ok(()));
        assert_eq!(guard.role(Role::Student), Ok(()));
        assert_eq!(guard.role(Role::Professor), Err(Error::NotAuthorized));
        assert_eq!(Guard::professor(db, &fx.student).err(), Some(Error::NotAuthorized));
        assert!(Guard::professor(db, &fx.professor).is_ok());
    }

    #[test]
    fn existence_ownership_and_membership() {
        let fx = Fixture::new();
        let db = fx.classroom.database();
        let group = fx.group();

        let owner = Guard::authenticate(db, &fx.professor).unwrap();
        let record: Group = owner.exists(&group).unwrap();
        assert_eq!(owner.owns(&record), Ok(()));
        assert_eq!(owner.exists::<Question>(&group).err(), Some(Error::ResourceNotFound(Kind::Question)));

        let rival = Guard::authenticate(db, &fx.rival).unwrap();
        assert_eq!(rival.owns(&record), Err(Error::NotAuthorized));

        let student = Guard::authenticate(db, &fx.student).unwrap();
        assert_eq!(student.member_of(&group), Err(Error::NotInGroup));
        assert_eq!(student.not_member_of(&group), Ok(()));

        fx.classroom.join_group(&fx.student, group).unwrap();
        let student = Guard::authenticate(db, &fx.student).unwrap();
        assert_eq!(student.member_of(&group), Ok(()));
        assert_eq!(student.not_member_of(&group), Err(Error::AlreadyInGroup));
    }

    #[test]
    fn self_or_admin() {
        let fx = Fixture::new();
        let db = fx.classroom.database();
        let student: Participant = Guard::authenticate(db, &fx.student).unwrap().user().clone();

        assert!(Guard::authenticate(db, &fx.student).unwrap().self_or_admin(&student).is_ok());
        assert!(Guard::authenticate(db, &fx.admin).unwrap().self_or_admin(&student).is_ok());
        assert_eq!(
            Guard::authenticate(db, &fx.professor).unwrap().self_or_admin(&student),
            Err(Error::NotAuthorized)
        );
    }
}
