use std::fmt;

#[derive(Debug)]
pub enum Error {
    Webhouse(webhouse::Error),
    Io(std::io::Error),
    Config(String),
}

impl From<webhouse::Error> for Error {
    fn from(err: webhouse::Error) -> Self {
        Self::Webhouse(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webhouse(err) => write!(f, "webhouse error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Config(reason) => write!(f, "config error: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
