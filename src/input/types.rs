use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Identifier of a single revision to score. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevId(NonZeroU64);

impl RevId {
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RevId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RevId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<NonZeroU64>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rev_id() {
        let id: RevId = "12345".parse().unwrap();
        assert_eq!(id.get(), 12345);
        assert_eq!(id.to_string(), "12345");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id: RevId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert!("0".parse::<RevId>().is_err());
        assert!("-5".parse::<RevId>().is_err());
        assert!(RevId::new(0).is_none());
    }

    #[test]
    fn test_rejects_non_integer() {
        assert!("abc".parse::<RevId>().is_err());
        assert!("1.5".parse::<RevId>().is_err());
        assert!("".parse::<RevId>().is_err());
    }
}
