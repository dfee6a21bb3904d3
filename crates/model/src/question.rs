use crate::{Id, Owned, Timestamp};
use alloc::{string::String, vec, vec::Vec};
use core::fmt::{self, Display};
use serde::{Deserialize, Serialize};

/// Ways in which a question's choices and answer key can be malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// Fewer than two possible answers were given.
    TooFewChoices,
    /// The correct answer does not index into the possible answers.
    AnswerOutOfBounds,
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TooFewChoices => "A question needs at least two possible answers.",
            Self::AnswerOutOfBounds => "The correct answer must be one of the possible answers.",
        })
    }
}

/// A timed multiple-choice question.
///
/// A question starts as a draft (no start time, inactive), becomes active once its owner sets a
/// start time, and is closed by a non-zero end time. An end time of zero is a sentinel for "open
/// indefinitely" and never deactivates the question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Id,
    pub user_id: Id,
    pub group_id: Id,
    pub quiz_id: Id,
    pub question_asked: String,
    pub possible_answers: Vec<String>,
    /// Index of the correct entry in `possible_answers`.
    pub answer: usize,
    pub active: bool,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

impl Question {
    pub fn validate(choices: &[String], answer: usize) -> Result<(), Violation> {
        if choices.len() < 2 {
            return Err(Violation::TooFewChoices);
        }
        if answer >= choices.len() {
            return Err(Violation::AnswerOutOfBounds);
        }
        Ok(())
    }

    /// Opens the answer window at `start`. Re-activating simply moves the start.
    pub fn activate(&mut self, start: Timestamp) {
        self.start_time = Some(start);
        self.active = true;
    }

    pub fn close(&mut self, end: Timestamp) {
        self.end_time = Some(end);
        if end != 0 {
            self.active = false;
        }
    }

    /// Whether `timestamp` falls inside `[start, end)`, or `[start, ∞)` while no end is recorded.
    pub fn accepts(&self, timestamp: Timestamp) -> bool {
        let Some(start) = self.start_time else {
            return false;
        };
        match self.end_time {
            None | Some(0) => timestamp >= start,
            Some(end) => (start..end).contains(&timestamp),
        }
    }

    /// Converts a raw selection into a choice index if it names one of the possible answers.
    pub fn choice(&self, selected: i64) -> Option<usize> {
        usize::try_from(selected).ok().filter(|&index| index < self.possible_answers.len())
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        self.answer == choice
    }
}

impl Owned for Question {
    fn owner(&self) -> Id {
        self.user_id
    }
}

/// A question as shown to the participants answering it: everything except the answer key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: Id,
    pub group_id: Id,
    pub quiz_id: Id,
    pub question_asked: String,
    pub possible_answers: Vec<String>,
    pub active: bool,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

impl From<Question> for Prompt {
    fn from(question: Question) -> Self {
        let Question { id, group_id, quiz_id, question_asked, possible_answers, active, start_time, end_time, .. } =
            question;
        Self { id, group_id, quiz_id, question_asked, possible_answers, active, start_time, end_time }
    }
}

/// One participant's answer to one question. At most one exists per `(question_id, user_id)`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: Id,
    pub group_id: Id,
    pub user_id: Id,
    /// Selected index into the question's possible answers.
    pub answer: usize,
    pub timestamp: Timestamp,
    /// Whether the selection matched the answer key when it was submitted. Later edits to the
    /// question do not revise this.
    pub correct: bool,
}

impl Answer {
    pub const fn key(&self) -> (Id, Id) {
        (self.question_id, self.user_id)
    }
}

/// Live tally of the answers to a question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    pub question_id: Id,
    /// Number of participants per possible answer.
    pub counts: Vec<u32>,
    pub responses: u32,
    pub correct: u32,
}

impl Results {
    pub fn tally<'a, I>(question: &Question, answers: I) -> Self
    where
        I: IntoIterator<Item = &'a Answer>,
    {
        let mut counts = vec![0; question.possible_answers.len()];
        let mut responses = 0;
        let mut correct = 0;
        for answer in answers {
            responses += 1;
            correct += u32::from(answer.correct);
            // Selections can point past the end after the choices were edited down.
            if let Some(count) = counts.get_mut(answer.answer) {
                *count += 1;
            }
        }
        Self { question_id: question.id, counts, responses, correct }
    }
}
