//! Gender - persona gender and target-demographic gender

use serde::{Deserialize, Serialize};

/// Gender of a dataset persona
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Female => write!(f, "female"),
            Gender::Male => write!(f, "male"),
            Gender::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            "other" => Ok(Gender::Other),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Target gender for a product. `Both` disables gender filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetGender {
    Female,
    Male,
    #[default]
    Both,
}

impl TargetGender {
    /// Parse model output, falling back to `Both` when unrecognized
    pub fn from_model_output(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// The persona gender this target matches, if it filters at all
    pub fn persona_gender(&self) -> Option<Gender> {
        match self {
            TargetGender::Female => Some(Gender::Female),
            TargetGender::Male => Some(Gender::Male),
            TargetGender::Both => None,
        }
    }
}

impl std::fmt::Display for TargetGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetGender::Female => write!(f, "female"),
            TargetGender::Male => write!(f, "male"),
            TargetGender::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for TargetGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" => Ok(TargetGender::Female),
            "male" => Ok(TargetGender::Male),
            "both" => Ok(TargetGender::Both),
            other => Err(format!("Unknown target gender: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_gender_fallback() {
        assert_eq!(TargetGender::from_model_output("Female"), TargetGender::Female);
        assert_eq!(TargetGender::from_model_output("BOTH"), TargetGender::Both);
        assert_eq!(
            TargetGender::from_model_output("all genders"),
            TargetGender::Both
        );
    }

    #[test]
    fn test_both_does_not_filter() {
        assert_eq!(TargetGender::Both.persona_gender(), None);
        assert_eq!(TargetGender::Male.persona_gender(), Some(Gender::Male));
    }
}
