use crate::{
    error::{Error, Kind, Result},
    guard::Guard,
    Classroom,
};
use model::{Group, GroupPatch, Id, Participant, Principal};
use std::collections::BTreeSet;

impl Classroom {
    /// Logged in → verified → professor.
    pub fn create_group(&self, principal: &Principal, name: String) -> Result<Id> {
        let guard = Guard::professor(&self.db, principal)?;
        let id = self.db.next_id();
        self.db.groups().insert(id, Group { id, user_id: guard.id(), name });
        log::info!("Participant {} created group {id}.", guard.id());
        Ok(id)
    }

    /// Logged in → verified → professor → group exists → group owned.
    pub fn update_group(&self, principal: &Principal, GroupPatch { id, name }: GroupPatch) -> Result<()> {
        let guard = Guard::professor(&self.db, principal)?;
        let group: Group = guard.exists(&id)?;
        guard.owns(&group)?;

        let owner = guard.id();
        self.db
            .groups()
            .update(&id, |group| group.user_id == owner, |group| group.name = name)
            .map_err(|_| Error::ResourceNotFound(Kind::Group))
    }

    /// Logged in → verified → professor → group exists → group owned.
    ///
    /// Removes the group, unenrolls every member, then removes the group's quizzes, questions and
    /// answers. Each of those steps is its own bulk write, so a failure part-way leaves the rest
    /// of the group's records behind.
    pub fn delete_group(&self, principal: &Principal, id: Id) -> Result<()> {
        let guard = Guard::professor(&self.db, principal)?;
        let group: Group = guard.exists(&id)?;
        guard.owns(&group)?;

        let owner = guard.id();
        self.db.groups().remove(&id, |group| group.user_id == owner).map_err(|_| Error::ResourceNotFound(Kind::Group))?;

        let members = self.db.users().update_where(|user| user.is_member_of(&id), |user| user.groups.retain(|g| *g != id));
        let quizzes = self.db.quizzes().remove_where(|quiz| quiz.group_id == id).len();
        let removed: BTreeSet<_> =
            self.db.questions().remove_where(|question| question.group_id == id).into_iter().map(|q| q.id).collect();
        let questions = removed.len();
        // Answers keep the group they were submitted in, so a question moved here later is matched by id.
        let answers = self
            .db
            .answers()
            .remove_where(|answer| answer.group_id == id || removed.contains(&answer.question_id))
            .len();
        log::info!(
            "Deleted group {id}: {members} members unenrolled, {quizzes} quizzes, {questions} questions and {answers} answers removed."
        );
        Ok(())
    }

    /// Logged in → verified → group exists → not yet a member.
    pub fn join_group(&self, principal: &Principal, id: Id) -> Result<()> {
        let guard = Guard::authenticate(&self.db, principal)?;
        guard.verified()?;
        guard.exists::<Group>(&id)?;
        guard.not_member_of(&id)?;

        self.db
            .users()
            .update(&guard.id(), |user| !user.is_member_of(&id), |user| user.groups.push(id))
            .map_err(|_| Error::AlreadyInGroup)
    }

    /// Logged in → verified → group exists → currently a member.
    pub fn leave_group(&self, principal: &Principal, id: Id) -> Result<()> {
        let guard = Guard::authenticate(&self.db, principal)?;
        guard.verified()?;
        guard.exists::<Group>(&id)?;
        guard.member_of(&id)?;

        self.db
            .users()
            .update(&guard.id(), |user| user.is_member_of(&id), |user| user.groups.retain(|g| *g != id))
            .map_err(|_| Error::NotInGroup)
    }

    /// Logged in → verified → group exists → user exists → user is a member → group owned.
    pub fn delete_user_from_group(&self, principal: &Principal, user: Id, group: Id) -> Result<()> {
        let guard = Guard::authenticate(&self.db, principal)?;
        guard.verified()?;
        let record: Group = guard.exists(&group)?;
        let member: Participant = guard.exists(&user)?;
        guard.enrolled(&member, &group)?;
        guard.owns(&record)?;

        self.db
            .users()
            .update(&user, |member| member.is_member_of(&group), |member| member.groups.retain(|g| *g != group))
            .map_err(|_| Error::NotInGroup)?;
        log::info!("Participant {} removed {user} from group {group}.", guard.id());
        Ok(())
    }
}
