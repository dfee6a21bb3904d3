use core::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    UnknownMethod,
    /// The positional arguments do not match the method's signature.
    InvalidParams,
    Denied(crate::error::Error),
}

impl Error {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownMethod => "unknownMethod",
            Self::InvalidParams => "invalidParams",
            Self::Denied(err) => err.code(),
        }
    }
}

impl From<crate::error::Error> for Error {
    fn from(err: crate::error::Error) -> Self {
        Self::Denied(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownMethod => "No such method.",
            Self::InvalidParams => "The arguments do not match the method.",
            Self::Denied(err) => return Display::fmt(err, f),
        })
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
