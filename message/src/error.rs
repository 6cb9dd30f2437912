use crate::FRAME_SIZE;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    #[error("malformed frame: expected {expected} bytes, got {len}", expected = FRAME_SIZE)]
    MalformedFrame { len: usize },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_names_lengths() {
        let msg = Error::MalformedFrame {
            len: 6,
        }
        .to_string();

        assert!(msg.contains("expected 7"));
        assert!(msg.contains("got 6"));
    }
}
