use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Install session identifier.
///
/// Opaque handle assigned by the installation service when a session is created.
/// Unique for the lifetime of the hosting process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(i64);

impl SessionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_creation() {
        let id = SessionId::new(1_234_567);
        assert_eq!(id.value(), 1_234_567);
        assert_eq!(id.to_string(), "1234567");
    }

    #[test]
    fn test_session_id_from_str_trims_whitespace() {
        let id: SessionId = " 42\n".parse().unwrap();
        assert_eq!(id, SessionId::from(42));
    }

    #[test]
    fn test_session_id_from_str_rejects_garbage() {
        assert!("session".parse::<SessionId>().is_err());
    }
}
