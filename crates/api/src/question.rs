use crate::{
    error::{Error, Kind, Result},
    guard::Guard,
    Classroom,
};
use model::{Group, Id, Principal, Question, Quiz, Timestamp};

impl Classroom {
    /// Logged in → verified → professor → group exists → group owned → quiz exists, followed by
    /// validation of the choices.
    ///
    /// The new question is appended to the quiz's question order when the caller owns that quiz
    /// and it belongs to the same group. Other quizzes are left for their owner to arrange.
    pub fn create_question(
        &self,
        principal: &Principal,
        quiz: Id,
        group: Id,
        question_asked: String,
        possible_answers: Vec<String>,
        answer: usize,
    ) -> Result<Id> {
        let guard = Guard::professor(&self.db, principal)?;
        let record: Group = guard.exists(&group)?;
        guard.owns(&record)?;
        guard.exists::<Quiz>(&quiz)?;
        Question::validate(&possible_answers, answer).map_err(Error::InvalidQuestion)?;

        let id = self.db.next_id();
        self.db.questions().insert(
            id,
            Question {
                id,
                user_id: guard.id(),
                group_id: group,
                quiz_id: quiz,
                question_asked,
                possible_answers,
                answer,
                active: false,
                start_time: None,
                end_time: None,
            },
        );

        let owner = guard.id();
        let appended = self
            .db
            .quizzes()
            .update(&quiz, |quiz| quiz.user_id == owner && quiz.group_id == group, |quiz| quiz.questions.push(id))
            .is_ok();
        if !appended {
            log::debug!("Question {id} was not appended to quiz {quiz}, which {owner} does not arrange in group {group}.");
        }
        log::info!("Participant {owner} created question {id} in quiz {quiz}.");
        Ok(id)
    }

    /// Logged in → verified → professor → question exists → question owned → group exists →
    /// group owned, followed by validation of the choices.
    ///
    /// Answers already submitted keep the correctness they were graded with.
    pub fn edit_question(
        &self,
        principal: &Principal,
        id: Id,
        group: Id,
        question_asked: String,
        possible_answers: Vec<String>,
        answer: usize,
    ) -> Result<()> {
        let guard = Guard::professor(&self.db, principal)?;
        let question: Question = guard.exists(&id)?;
        guard.owns(&question)?;
        let record: Group = guard.exists(&group)?;
        guard.owns(&record)?;
        Question::validate(&possible_answers, answer).map_err(Error::InvalidQuestion)?;

        let owner = guard.id();
        self.db
            .questions()
            .update(
                &id,
                |question| question.user_id == owner,
                |question| {
                    question.group_id = group;
                    question.question_asked = question_asked;
                    question.possible_answers = possible_answers;
                    question.answer = answer;
                },
            )
            .map_err(|_| Error::ResourceNotFound(Kind::Question))
    }

    /// Logged in → verified → professor → question exists → question owned.
    ///
    /// Opens the answer window at `start`, activating the question.
    pub fn update_question_start_time(&self, principal: &Principal, id: Id, start: Timestamp) -> Result<()> {
        self.transition(principal, id, |question| question.activate(start))?;
        log::info!("Question {id} opened at {start}.");
        Ok(())
    }

    /// Logged in → verified → professor → question exists → question owned.
    ///
    /// Records the end of the answer window. Any non-zero end also deactivates the question.
    pub fn update_question_end_time(&self, principal: &Principal, id: Id, end: Timestamp) -> Result<()> {
        self.transition(principal, id, |question| question.close(end))?;
        log::info!("Question {id} closes at {end}.");
        Ok(())
    }

    fn transition<S>(&self, principal: &Principal, id: Id, set: S) -> Result<()>
    where
        S: FnOnce(&mut Question),
    {
        let guard = Guard::professor(&self.db, principal)?;
        let question: Question = guard.exists(&id)?;
        guard.owns(&question)?;

        let owner = guard.id();
        self.db
            .questions()
            .update(&id, |question| question.user_id == owner, set)
            .map_err(|_| Error::ResourceNotFound(Kind::Question))
    }

    /// Logged in → verified → professor → question exists → question owned.
    ///
    /// Scrubs the question from every quiz and removes its answers. Between the removal and the
    /// scrub, quizzes may still list the id.
    pub fn delete_question(&self, principal: &Principal, id: Id) -> Result<()> {
        let guard = Guard::professor(&self.db, principal)?;
        let question: Question = guard.exists(&id)?;
        guard.owns(&question)?;

        let owner = guard.id();
        self.db
            .questions()
            .remove(&id, |question| question.user_id == owner)
            .map_err(|_| Error::ResourceNotFound(Kind::Question))?;

        let quizzes =
            self.db.quizzes().update_where(|quiz| quiz.questions.contains(&id), |quiz| quiz.questions.retain(|q| *q != id));
        let answers = self.db.answers().remove_where(|answer| answer.question_id == id).len();
        log::info!("Deleted question {id}: scrubbed from {quizzes} quizzes, {answers} answers removed.");
        Ok(())
    }
}
