//! Method-name dispatch over the classroom operations.

pub mod error;

use crate::Classroom;
use model::{GroupPatch, Id, Principal, UserPatch};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

/// A remote call: the method name plus its positional arguments.
#[derive(Debug, Deserialize)]
pub struct Call {
    pub method: Box<str>,
    #[serde(default)]
    pub params: Vec<Value>,
}

/// Decodes the positional arguments into a tuple. Arity and types must both match.
fn params<T: DeserializeOwned>(params: Vec<Value>) -> error::Result<T> {
    serde_json::from_value(Value::Array(params)).map_err(|err| {
        log::debug!("Rejected call arguments: {err}");
        error::Error::InvalidParams
    })
}

impl Classroom {
    pub fn call(&self, principal: &Principal, Call { method, params: args }: Call) -> error::Result<()> {
        log::trace!("Dispatching {method} for {principal:?}.");
        let result = match method.as_ref() {
            "answerQuestion" => {
                let (question, selected, timestamp): (Id, i64, u64) = params(args)?;
                self.answer_question(principal, question, selected, timestamp)
            }
            "createGroup" => {
                let (name,): (String,) = params(args)?;
                self.create_group(principal, name).map(drop)
            }
            "createQuestion" => {
                let (quiz, group, asked, choices, answer): (Id, Id, String, Vec<String>, usize) = params(args)?;
                self.create_question(principal, quiz, group, asked, choices, answer).map(drop)
            }
            "createQuiz" => {
                let (name, group): (String, Id) = params(args)?;
                self.create_quiz(principal, name, group).map(drop)
            }
            "deleteGroup" => {
                let (group,): (Id,) = params(args)?;
                self.delete_group(principal, group)
            }
            "deleteQuestion" => {
                let (question,): (Id,) = params(args)?;
                self.delete_question(principal, question)
            }
            "deleteQuiz" => {
                let (quiz,): (Id,) = params(args)?;
                self.delete_quiz(principal, quiz)
            }
            "editQuestion" => {
                let (question, group, asked, choices, answer): (Id, Id, String, Vec<String>, usize) = params(args)?;
                self.edit_question(principal, question, group, asked, choices, answer)
            }
            "editQuiz" => {
                let (quiz, questions, owner, name): (Id, Vec<Id>, Id, String) = params(args)?;
                self.edit_quiz(principal, quiz, questions, owner, name)
            }
            "joinGroup" => {
                let (group,): (Id,) = params(args)?;
                self.join_group(principal, group)
            }
            "leaveGroup" => {
                let (group,): (Id,) = params(args)?;
                self.leave_group(principal, group)
            }
            "updateGroup" => {
                let (patch,): (GroupPatch,) = params(args)?;
                self.update_group(principal, patch)
            }
            "updateQuestionStartTime" => {
                let (question, start): (Id, u64) = params(args)?;
                self.update_question_start_time(principal, question, start)
            }
            "updateQuestionEndTime" => {
                let (question, end): (Id, u64) = params(args)?;
                self.update_question_end_time(principal, question, end)
            }
            "updateRoles" => {
                let (user, student, professor, admin): (Id, bool, bool, bool) = params(args)?;
                self.update_roles(principal, user, student, professor, admin)
            }
            "updateUser" => {
                let (patch,): (UserPatch,) = params(args)?;
                self.update_user(principal, patch)
            }
            "deleteUserFromGroup" => {
                let (user, group): (Id, Id) = params(args)?;
                self.delete_user_from_group(principal, user, group)
            }
            _ => return Err(error::Error::UnknownMethod),
        };
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::{error::Error, Call};
    use crate::{error, fixture::Fixture};
    use serde_json::json;

    fn call(value: serde_json::Value) -> Call {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn dispatches_by_name() {
        let fx = Fixture::new();
        let group = fx.group();
        let body = call(json!({ "method": "joinGroup", "params": [group.to_string()] }));
        assert_eq!(fx.classroom.call(&fx.student, body), Ok(()));
        assert!(fx.classroom.database().users().get(&Fixture::id(&fx.student)).unwrap().is_member_of(&group));

        let body = call(json!({ "method": "updateGroup", "params": [{ "_id": group.to_string(), "name": "Renamed" }] }));
        assert_eq!(fx.classroom.call(&fx.professor, body), Ok(()));
        assert_eq!(fx.classroom.database().groups().get(&group).unwrap().name, "Renamed");
    }

    #[test]
    fn reports_operation_errors() {
        let fx = Fixture::new();
        let body = call(json!({ "method": "createGroup", "params": ["Physics"] }));
        let err = fx.classroom.call(&fx.student, body).unwrap_err();
        assert_eq!(err, Error::Denied(error::Error::NotAuthorized));
        assert_eq!(err.code(), "notAuthorized");
    }

    #[test]
    fn rejects_malformed_calls() {
        let fx = Fixture::new();
        let body = call(json!({ "method": "dropDatabase" }));
        assert_eq!(fx.classroom.call(&fx.admin, body), Err(Error::UnknownMethod));

        let body = call(json!({ "method": "createGroup", "params": [] }));
        assert_eq!(fx.classroom.call(&fx.professor, body), Err(Error::InvalidParams));

        let body = call(json!({ "method": "createGroup", "params": ["Physics", "Chemistry"] }));
        assert_eq!(fx.classroom.call(&fx.professor, body), Err(Error::InvalidParams));

        let body = call(json!({ "method": "joinGroup", "params": ["not hex"] }));
        assert_eq!(fx.classroom.call(&fx.student, body), Err(Error::InvalidParams));
        assert!(fx.classroom.database().groups().is_empty());
    }

    #[test]
    fn negative_selections_reach_the_range_check() {
        let fx = Fixture::new();
        let (_, _, question) = fx.setup();
        fx.classroom.update_question_start_time(&fx.professor, question, 1000).unwrap();
        let body = call(json!({ "method": "answerQuestion", "params": [question.to_string(), -1, 1500] }));
        assert_eq!(fx.classroom.call(&fx.student, body), Err(Error::Denied(error::Error::AnswerOutOfRange)));
    }
}
