use core::fmt::{self, Display};

pub use model::Violation;

/// Collection named by a [`Error::ResourceNotFound`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    User,
    Group,
    Quiz,
    Question,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Not logged in, not verified, missing a role, or not the owner.
    NotAuthorized,
    ResourceNotFound(Kind),
    NotInGroup,
    AlreadyInGroup,
    QuestionInactive,
    AnswerOutOfRange,
    AnswerOutOfTime,
    InvalidQuestion(Violation),
}

impl Error {
    /// Stable machine-readable name of the error kind.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "notAuthorized",
            Self::ResourceNotFound(_) => "resourceNotFound",
            Self::NotInGroup => "notInGroup",
            Self::AlreadyInGroup => "alreadyInGroup",
            Self::QuestionInactive => "questionInactive",
            Self::AnswerOutOfRange => "answerOutOfRange",
            Self::AnswerOutOfTime => "answerOutOfTime",
            Self::InvalidQuestion(_) => "invalidQuestion",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotAuthorized => "You are not authorized to do that.",
            Self::ResourceNotFound(Kind::User) => "User does not exist.",
            Self::ResourceNotFound(Kind::Group) => "Group does not exist.",
            Self::ResourceNotFound(Kind::Quiz) => "Quiz does not exist.",
            Self::ResourceNotFound(Kind::Question) => "Question does not exist.",
            Self::NotInGroup => "You are not in that group.",
            Self::AlreadyInGroup => "You are already in that group.",
            Self::QuestionInactive => "That question is not active.",
            Self::AnswerOutOfRange => "That answer is not one of the choices.",
            Self::AnswerOutOfTime => "That answer was not submitted while the question was open.",
            Self::InvalidQuestion(violation) => return Display::fmt(violation, f),
        })
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
