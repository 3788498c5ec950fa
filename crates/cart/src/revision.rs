use serde::{Deserialize, Serialize};

/// Revision number of a published cart snapshot.
///
/// Revision 0 is the state produced by initialization (whatever was loaded
/// from the store). Every effective mutation advances the revision by one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Creates a revision from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the initial revision (0).
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the next revision.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw revision value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Revision {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_revision_is_zero() {
        assert_eq!(Revision::initial().as_u64(), 0);
        assert_eq!(Revision::default(), Revision::initial());
    }

    #[test]
    fn next_advances_by_one() {
        let rev = Revision::initial().next().next();
        assert_eq!(rev, Revision::new(2));
        assert!(rev > Revision::initial());
    }
}
