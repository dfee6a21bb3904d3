use crate::{
    error::{Error, Kind, Result},
    guard::Guard,
    Classroom,
};
use model::{Id, Participant, Principal, Role, UserPatch};

impl Classroom {
    /// Logged in → verified → admin → user exists.
    ///
    /// Replaces the user's whole role set with exactly the flagged roles.
    pub fn update_roles(&self, principal: &Principal, user: Id, student: bool, professor: bool, admin: bool) -> Result<()> {
        let guard = Guard::authenticate(&self.db, principal)?;
        guard.verified()?;
        guard.role(Role::Admin)?;
        guard.exists::<Participant>(&user)?;

        let roles = Role::set(student, professor, admin);
        log::info!("Participant {} set the roles of {user} to {roles:?}.", guard.id());
        if user == guard.id() && !admin {
            log::warn!("Administrator {user} revoked their own administrator role.");
        }

        self.db.users().update(&user, |_| true, |record| record.roles = roles).map_err(|_| Error::ResourceNotFound(Kind::User))
    }

    /// Logged in → verified → user exists → caller is that user or an admin.
    pub fn update_user(&self, principal: &Principal, patch: UserPatch) -> Result<()> {
        let guard = Guard::authenticate(&self.db, principal)?;
        guard.verified()?;
        let user: Participant = guard.exists(&patch.id)?;
        guard.self_or_admin(&user)?;

        let id = patch.id;
        self.db.users().update(&id, |_| true, |record| patch.apply(record)).map_err(|_| Error::ResourceNotFound(Kind::User))
    }
}
