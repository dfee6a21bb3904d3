//! Live record sets pushed to subscribers as the store changes.

use crate::{error::Result, guard::Guard, Classroom};
use db::{Change, Database};
use futures_util::{stream, Stream};
use model::{Answer, Group, Id, Principal, Prompt, Question, Quiz, Results};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};

/// A named, parameterized query a participant may subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Publication {
    OwnedGroups,
    JoinedGroups,
    OwnedQuizzes,
    OwnedQuestions,
    /// Active questions of a group, with the answer key withheld.
    GroupQuestions(Id),
    MyAnswers,
    QuestionAnswers(Id),
    QuestionResults(Id),
}

impl Publication {
    /// Resolves a publication by name. Publications over a group or question require `id`.
    pub fn parse(name: &str, id: Option<Id>) -> Option<Self> {
        Some(match name {
            "ownedGroups" => Self::OwnedGroups,
            "joinedGroups" => Self::JoinedGroups,
            "ownedQuizzes" => Self::OwnedQuizzes,
            "ownedQuestions" => Self::OwnedQuestions,
            "groupQuestions" => Self::GroupQuestions(id?),
            "myAnswers" => Self::MyAnswers,
            "questionAnswers" => Self::QuestionAnswers(id?),
            "questionResults" => Self::QuestionResults(id?),
            _ => return None,
        })
    }

    /// Whether a write to the given collection may alter this publication's record set.
    fn watches(self, change: Change) -> bool {
        match self {
            Self::OwnedGroups => change == Change::Groups,
            Self::JoinedGroups => matches!(change, Change::Users | Change::Groups),
            Self::OwnedQuizzes => change == Change::Quizzes,
            Self::OwnedQuestions => change == Change::Questions,
            Self::GroupQuestions(_) => matches!(change, Change::Users | Change::Questions),
            Self::MyAnswers | Self::QuestionAnswers(_) => change == Change::Answers,
            Self::QuestionResults(_) => matches!(change, Change::Answers | Change::Questions),
        }
    }

    fn snapshot(self, db: &Database, user: Id) -> Snapshot {
        match self {
            Self::OwnedGroups => Snapshot::Groups(db.groups().find(|group| group.user_id == user)),
            Self::JoinedGroups => {
                let joined = db.users().get(&user).map(|user| user.groups).unwrap_or_default();
                Snapshot::Groups(db.groups().find(|group| joined.contains(&group.id)))
            }
            Self::OwnedQuizzes => Snapshot::Quizzes(db.quizzes().find(|quiz| quiz.user_id == user)),
            Self::OwnedQuestions => Snapshot::Questions(db.questions().find(|question| question.user_id == user)),
            Self::GroupQuestions(group) => {
                let member = db.users().get(&user).is_some_and(|user| user.is_member_of(&group));
                let prompts = if member {
                    let questions = db.questions().find(|question| question.group_id == group && question.active);
                    questions.into_iter().map(Prompt::from).collect()
                } else {
                    Vec::new()
                };
                Snapshot::Prompts(prompts)
            }
            Self::MyAnswers => Snapshot::Answers(db.answers().find(|answer| answer.user_id == user)),
            Self::QuestionAnswers(question) => {
                Snapshot::Answers(db.answers().find(|answer| answer.question_id == question))
            }
            Self::QuestionResults(question) => Snapshot::Results(db.questions().get(&question).map(|record| {
                let answers = db.answers().find(|answer| answer.question_id == question);
                Results::tally(&record, &answers)
            })),
        }
    }
}

/// One complete record set, as sent to the subscriber.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "collection", content = "records", rename_all = "camelCase")]
pub enum Snapshot {
    Groups(Vec<Group>),
    Quizzes(Vec<Quiz>),
    Questions(Vec<Question>),
    Prompts(Vec<Prompt>),
    Answers(Vec<Answer>),
    /// Absent once the question has been deleted.
    Results(Option<Results>),
}

struct Feed {
    db: Arc<Database>,
    changes: Receiver<Change>,
    publication: Publication,
    user: Id,
    last: Option<Snapshot>,
}

impl Feed {
    async fn next(mut self) -> Option<(Snapshot, Self)> {
        loop {
            if self.last.is_some() {
                match self.changes.recv().await {
                    Ok(change) if self.publication.watches(change) => (),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("Subscription {:?} of {} lagged by {skipped} changes.", self.publication, self.user);
                    }
                    Err(RecvError::Closed) => return None,
                }
            }

            let snapshot = self.publication.snapshot(&self.db, self.user);
            if self.last.as_ref() == Some(&snapshot) {
                continue;
            }
            self.last = Some(snapshot.clone());
            return Some((snapshot, self));
        }
    }
}

impl Classroom {
    /// Logged in → verified, plus group exists → member for [`Publication::GroupQuestions`] and
    /// question exists → question owned for the per-question publications.
    ///
    /// The stream yields the current record set first, then every distinct record set after a
    /// write to a watched collection.
    pub fn subscribe(
        &self,
        principal: &Principal,
        publication: Publication,
    ) -> Result<impl Stream<Item = Snapshot> + Send + 'static> {
        let guard = Guard::authenticate(&self.db, principal)?;
        guard.verified()?;
        match publication {
            Publication::GroupQuestions(group) => {
                guard.exists::<Group>(&group)?;
                guard.member_of(&group)?;
            }
            Publication::QuestionAnswers(question) | Publication::QuestionResults(question) => {
                let question: Question = guard.exists(&question)?;
                guard.owns(&question)?;
            }
            _ => (),
        }

        // Subscribe before the first snapshot so that no committed write falls in between.
        let changes = self.db.subscribe();
        log::debug!("Participant {} subscribed to {publication:?}.", guard.id());
        let feed = Feed { db: Arc::clone(&self.db), changes, publication, user: guard.id(), last: None };
        Ok(stream::unfold(feed, Feed::next))
    }
}
