use crate::{
    error::{Error, Kind, Result},
    guard::Guard,
    Classroom,
};
use model::{Group, Id, Participant, Principal, Quiz};
use std::collections::BTreeSet;

impl Classroom {
    /// Logged in → verified → professor → group exists → group owned.
    pub fn create_quiz(&self, principal: &Principal, name: String, group: Id) -> Result<Id> {
        let guard = Guard::professor(&self.db, principal)?;
        let record: Group = guard.exists(&group)?;
        guard.owns(&record)?;

        let id = self.db.next_id();
        self.db.quizzes().insert(id, Quiz { id, user_id: guard.id(), group_id: group, name, questions: Vec::new() });
        log::info!("Participant {} created quiz {id} in group {group}.", guard.id());
        Ok(id)
    }

    /// Logged in → verified → professor → quiz exists → quiz owned → new owner exists.
    ///
    /// Replaces the question order, the owner and the name in one write.
    pub fn edit_quiz(&self, principal: &Principal, id: Id, questions: Vec<Id>, owner: Id, name: String) -> Result<()> {
        let guard = Guard::professor(&self.db, principal)?;
        let quiz: Quiz = guard.exists(&id)?;
        guard.owns(&quiz)?;
        guard.exists::<Participant>(&owner)?;

        let current = guard.id();
        self.db
            .quizzes()
            .update(
                &id,
                |quiz| quiz.user_id == current,
                |quiz| {
                    quiz.questions = questions;
                    quiz.user_id = owner;
                    quiz.name = name;
                },
            )
            .map_err(|_| Error::ResourceNotFound(Kind::Quiz))?;

        if owner != current {
            log::info!("Quiz {id} transferred from {current} to {owner}.");
        }
        Ok(())
    }

    /// Logged in → verified → professor → quiz exists → quiz owned.
    ///
    /// Also removes the quiz's questions and every answer to them.
    pub fn delete_quiz(&self, principal: &Principal, id: Id) -> Result<()> {
        let guard = Guard::professor(&self.db, principal)?;
        let quiz: Quiz = guard.exists(&id)?;
        guard.owns(&quiz)?;

        let owner = guard.id();
        self.db.quizzes().remove(&id, |quiz| quiz.user_id == owner).map_err(|_| Error::ResourceNotFound(Kind::Quiz))?;

        let removed: BTreeSet<_> =
            self.db.questions().remove_where(|question| question.quiz_id == id).into_iter().map(|q| q.id).collect();
        let answers = if removed.is_empty() {
            0
        } else {
            self.db.answers().remove_where(|answer| removed.contains(&answer.question_id)).len()
        };
        log::info!("Deleted quiz {id} with {} questions and {answers} answers.", removed.len());
        Ok(())
    }
}
