use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] codec::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Codec(e) if e.is_malformed())
    }
}
