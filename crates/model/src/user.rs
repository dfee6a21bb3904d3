use crate::{Id, Owned};
use alloc::{collections::BTreeSet, string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// Global roles. These are independent of each other: a professor is not implicitly a student.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
    Admin,
}

impl Role {
    /// Builds a complete role set from one flag per role.
    pub fn set(student: bool, professor: bool, admin: bool) -> BTreeSet<Self> {
        [(student, Self::Student), (professor, Self::Professor), (admin, Self::Admin)]
            .into_iter()
            .filter_map(|(wanted, role)| wanted.then_some(role))
            .collect()
    }
}

fn default_roles() -> BTreeSet<Role> {
    BTreeSet::from([Role::Student])
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub institution: String,
    pub faculty: String,
    pub student_id: String,
}

/// An entry of the identity directory.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Id,
    #[serde(default)]
    pub username: Option<String>,
    /// Whether the participant has confirmed their e-mail address.
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_roles")]
    pub roles: BTreeSet<Role>,
    /// Joined groups, in joining order.
    #[serde(default)]
    pub groups: Vec<Id>,
    #[serde(default)]
    pub profile: Profile,
}

impl Participant {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_member_of(&self, group: &Id) -> bool {
        self.groups.contains(group)
    }
}

/// A participant record belongs to the participant it describes.
impl Owned for Participant {
    fn owner(&self) -> Id {
        self.id
    }
}

/// Profile fields to overwrite. Absent fields keep their stored value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub institution: Option<String>,
    pub faculty: Option<String>,
    pub student_id: Option<String>,
}

/// Editable subset of a participant record. Absent fields keep their stored value.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(alias = "_id")]
    pub id: Id,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub profile: ProfilePatch,
}

impl UserPatch {
    pub fn apply(self, user: &mut Participant) {
        let ProfilePatch { institution, faculty, student_id } = self.profile;
        if let Some(username) = self.username {
            user.username = Some(username);
        }
        let profile = &mut user.profile;
        for (value, field) in [
            (institution, &mut profile.institution),
            (faculty, &mut profile.faculty),
            (student_id, &mut profile.student_id),
        ] {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Participant, Role, UserPatch};
    use alloc::{collections::BTreeSet, string::String};

    #[test]
    fn patches_overwrite_only_present_fields() {
        let mut user: Participant = serde_json::from_str(
            r#"{ "id": "000000000000000000000001", "username": "juan",
                 "profile": { "institution": "UP Diliman", "faculty": "Engineering", "studentId": "2020-00001" } }"#,
        )
        .unwrap();

        let patch: UserPatch =
            serde_json::from_str(r#"{ "_id": "000000000000000000000001", "profile": { "faculty": "Science" } }"#).unwrap();
        patch.apply(&mut user);
        assert_eq!(user.username.as_deref(), Some("juan"));
        assert_eq!(user.profile.institution, "UP Diliman");
        assert_eq!(user.profile.faculty, "Science");
        assert_eq!(user.profile.student_id, "2020-00001");

        let patch: UserPatch =
            serde_json::from_str(r#"{ "id": "000000000000000000000001", "username": "maria" }"#).unwrap();
        patch.apply(&mut user);
        assert_eq!(user.username, Some(String::from("maria")));
        assert_eq!(user.profile.faculty, "Science");
    }

    #[test]
    fn role_flags_build_exact_sets() {
        assert!(Role::set(false, false, false).is_empty());
        assert_eq!(Role::set(true, false, true), BTreeSet::from([Role::Student, Role::Admin]));
        assert_eq!(Role::set(false, true, false), BTreeSet::from([Role::Professor]));
    }

    #[test]
    fn missing_fields_take_directory_defaults() {
        let user: Participant = serde_json::from_str(r#"{ "id": "000000000000000000000001" }"#).unwrap();
        assert!(!user.verified);
        assert!(user.has_role(Role::Student));
        assert!(!user.has_role(Role::Professor));
        assert!(user.groups.is_empty());
        assert_eq!(user.profile.student_id, "");
    }
}
