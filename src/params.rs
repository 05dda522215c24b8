//! Threshold configuration shared by the DKG and refresh state machines.

use crate::error::{Error, Result};

/// `2 <= threshold <= share_count`, validated once at construction so
/// every downstream component can assume it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdParameters {
    pub share_count: u16,
    pub threshold: u16,
}

impl ThresholdParameters {
    pub fn new(share_count: u16, threshold: u16) -> Result<Self> {
        if threshold < 2 {
            return Err(Error::Config("threshold must be at least 2"));
        }
        if threshold > share_count {
            return Err(Error::Config("threshold must not exceed the share count"));
        }
        Ok(ThresholdParameters { share_count, threshold })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_threshold_below_two() {
        assert!(ThresholdParameters::new(5, 1).is_err());
    }

    #[test]
    fn rejects_threshold_above_share_count() {
        assert!(ThresholdParameters::new(3, 4).is_err());
    }

    #[test]
    fn accepts_the_boundary_case() {
        assert!(ThresholdParameters::new(2, 2).is_ok());
    }
}
