use crate::{Id, Owned};
use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// A cohort scoping quizzes, questions and membership.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Id,
    /// Professor who created the group.
    pub user_id: Id,
    pub name: String,
}

impl Owned for Group {
    fn owner(&self) -> Id {
        self.user_id
    }
}

/// Argument of the group rename operation.
#[derive(Clone, Debug, Deserialize)]
pub struct GroupPatch {
    #[serde(alias = "_id")]
    pub id: Id,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Id,
    pub user_id: Id,
    pub group_id: Id,
    pub name: String,
    /// Presentation order of the questions. Entries may outlive the question they point to until
    /// the deletion scrub reaches this quiz.
    pub questions: Vec<Id>,
}

impl Owned for Quiz {
    fn owner(&self) -> Id {
        self.user_id
    }
}
