//! Decision - simulated purchase decision

use serde::{Deserialize, Serialize};

/// Purchase decision returned by the simulation step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Yes,
    No,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Yes => write!(f, "yes"),
            Decision::No => write!(f, "no"),
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(Decision::Yes),
            "no" => Ok(Decision::No),
            other => Err(format!("Unknown decision: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("yes".parse::<Decision>().unwrap(), Decision::Yes);
        assert_eq!("YES".parse::<Decision>().unwrap(), Decision::Yes);
        assert_eq!(" No ".parse::<Decision>().unwrap(), Decision::No);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("maybe".parse::<Decision>().is_err());
        assert!("".parse::<Decision>().is_err());
    }
}
