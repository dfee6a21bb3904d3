#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod id;
pub mod question;
pub mod quiz;
pub mod session;
pub mod user;

pub use id::Id;
pub use question::{Answer, Prompt, Question, Results, Violation};
pub use quiz::{Group, GroupPatch, Quiz};
pub use session::{Account, Principal};
pub use user::{Participant, Profile, ProfilePatch, Role, UserPatch};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Records that carry an immutable owner field.
pub trait Owned {
    fn owner(&self) -> Id;
}
