use thiserror::Error;

pub mod decode;
pub mod encode;
pub mod value;




#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded item")]
    InsufficientData,

    #[error("Next element does not have the requested type")]
    UnexpectedType,

    #[error("Integer or length outside the representable range")]
    Overflow,

    #[error("Unsupported tag {0}")]
    UnsupportedTag(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Text string is not valid UTF-8")]
    InvalidUtf8,
}

impl From<core::str::Utf8Error> for Error {
    fn from(_: core::str::Utf8Error) -> Self {
        Error::InvalidUtf8
    }
}
