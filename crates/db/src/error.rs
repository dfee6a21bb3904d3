use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// No record with the given key matched the update filter.
    NotFound,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "No record matched the filter.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
