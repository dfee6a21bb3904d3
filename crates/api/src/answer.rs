use crate::{error::Result, guard::Guard, Classroom};
use model::{Answer, Id, Principal, Question, Timestamp};

impl Classroom {
    /// Logged in → verified → question exists → question active → member of the question's group
    /// → selection in range → timestamp within the answer window.
    ///
    /// Each participant holds at most one answer per question; resubmitting overwrites it.
    pub fn answer_question(&self, principal: &Principal, question: Id, selected: i64, timestamp: Timestamp) -> Result<()> {
        let guard = Guard::authenticate(&self.db, principal)?;
        guard.verified()?;
        let question: Question = guard.exists(&question)?;
        guard.active(&question)?;
        guard.member_of(&question.group_id)?;
        let choice = guard.answer_in_range(&question, selected)?;
        guard.within_window(&question, timestamp)?;

        let correct = question.is_correct(choice);
        let answer = Answer {
            question_id: question.id,
            group_id: question.group_id,
            user_id: guard.id(),
            answer: choice,
            timestamp,
            correct,
        };
        let inserted = self.db.answers().upsert(
            answer.key(),
            || answer.clone(),
            |previous| {
                previous.answer = choice;
                previous.timestamp = timestamp;
                previous.correct = correct;
            },
        );

        if inserted {
            log::debug!("Participant {} answered question {}.", guard.id(), question.id);
        } else {
            log::debug!("Participant {} revised their answer to question {}.", guard.id(), question.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::{Error, Kind},
        fixture::Fixture,
    };
    use model::{Id, Principal};

    #[test]
    fn two_plus_two() {
        let fx = Fixture::new();
        let (_, _, question) = fx.setup();
        let db = fx.classroom.database();
        let student = Fixture::id(&fx.student);

        // Drafts do not accept answers.
        assert_eq!(fx.classroom.answer_question(&fx.student, question, 1, 1500), Err(Error::QuestionInactive));

        fx.classroom.update_question_start_time(&fx.professor, question, 1000).unwrap();
        fx.classroom.answer_question(&fx.student, question, 1, 1500).unwrap();
        let answer = db.answers().get(&(question, student)).unwrap();
        assert_eq!(answer.answer, 1);
        assert!(answer.correct);

        // Changing one's mind overwrites the single record.
        fx.classroom.answer_question(&fx.student, question, 2, 1600).unwrap();
        assert_eq!(db.answers().len(), 1);
        let answer = db.answers().get(&(question, student)).unwrap();
        assert_eq!(answer.answer, 2);
        assert_eq!(answer.timestamp, 1600);
        assert!(!answer.correct);

        fx.classroom.update_question_end_time(&fx.professor, question, 2000).unwrap();
        assert_eq!(fx.classroom.answer_question(&fx.student, question, 1, 2500), Err(Error::QuestionInactive));
    }

    #[test]
    fn resubmitting_is_idempotent() {
        let fx = Fixture::new();
        let (_, _, question) = fx.setup();
        fx.classroom.update_question_start_time(&fx.professor, question, 1000).unwrap();
        for _ in 0..3 {
            fx.classroom.answer_question(&fx.student, question, 1, 1500).unwrap();
        }
        let db = fx.classroom.database();
        assert_eq!(db.answers().len(), 1);
        assert_eq!(db.answers().get(&(question, Fixture::id(&fx.student))).unwrap().timestamp, 1500);
    }

    #[test]
    fn rejections_follow_the_check_order() {
        let fx = Fixture::new();
        let (_, _, question) = fx.setup();
        fx.classroom.update_question_start_time(&fx.professor, question, 1000).unwrap();
        let answer = |who: &Principal, selected, timestamp| fx.classroom.answer_question(who, question, selected, timestamp);

        assert_eq!(answer(&Principal::Anonymous, 1, 1500), Err(Error::NotAuthorized));
        assert_eq!(answer(&fx.unverified, 1, 1500), Err(Error::NotAuthorized));
        assert_eq!(
            fx.classroom.answer_question(&fx.student, Id::new(0, 0), 1, 1500),
            Err(Error::ResourceNotFound(Kind::Question))
        );
        assert_eq!(answer(&fx.rival, 1, 1500), Err(Error::NotInGroup));

        // Range is checked before the window.
        assert_eq!(answer(&fx.student, 5, 1500), Err(Error::AnswerOutOfRange));
        assert_eq!(answer(&fx.student, -1, 999), Err(Error::AnswerOutOfRange));
        assert_eq!(answer(&fx.student, 1, 999), Err(Error::AnswerOutOfTime));
        assert!(fx.classroom.database().answers().is_empty());
    }

    #[test]
    fn end_of_window_is_exclusive_while_the_question_stays_open() {
        let fx = Fixture::new();
        let (_, _, question) = fx.setup();
        fx.classroom.update_question_start_time(&fx.professor, question, 1000).unwrap();
        fx.classroom.update_question_end_time(&fx.professor, question, 2000).unwrap();
        // Re-opening keeps the old end time, which still bounds the window.
        fx.classroom.update_question_start_time(&fx.professor, question, 1000).unwrap();

        fx.classroom.answer_question(&fx.student, question, 1, 1999).unwrap();
        assert_eq!(fx.classroom.answer_question(&fx.student, question, 1, 2000), Err(Error::AnswerOutOfTime));
    }

    #[test]
    fn correctness_is_graded_at_submission() {
        let fx = Fixture::new();
        let (group, _, question) = fx.setup();
        fx.classroom.update_question_start_time(&fx.professor, question, 1000).unwrap();
        fx.classroom.answer_question(&fx.student, question, 1, 1500).unwrap();

        let choices = ["3", "4", "5"].map(String::from).to_vec();
        fx.classroom.edit_question(&fx.professor, question, group, String::from("2+1?"), choices, 0).unwrap();

        let answer = fx.classroom.database().answers().get(&(question, Fixture::id(&fx.student))).unwrap();
        assert!(answer.correct);
    }
}
