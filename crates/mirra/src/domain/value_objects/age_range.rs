//! AgeRange - demographic age buckets
//!
//! The four buckets are the reporting buckets of the analysis response:
//! 18-29, 30-49, 50-64, 65+. Ages below 18 have no bucket and are skipped
//! by aggregation.

use serde::{Deserialize, Serialize};

/// Demographic age bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeRange {
    #[serde(rename = "18-29")]
    Age18To29,
    #[serde(rename = "30-49")]
    Age30To49,
    #[serde(rename = "50-64")]
    Age50To64,
    #[serde(rename = "65+")]
    Age65Plus,
}

impl AgeRange {
    /// All buckets, in reporting order
    pub const ALL: [AgeRange; 4] = [
        AgeRange::Age18To29,
        AgeRange::Age30To49,
        AgeRange::Age50To64,
        AgeRange::Age65Plus,
    ];

    /// Bucket a numeric age. Under-18 ages have no bucket.
    pub fn from_age(age: i32) -> Option<Self> {
        match age {
            18..=29 => Some(AgeRange::Age18To29),
            30..=49 => Some(AgeRange::Age30To49),
            50..=64 => Some(AgeRange::Age50To64),
            a if a >= 65 => Some(AgeRange::Age65Plus),
            _ => None,
        }
    }

    /// Inclusive numeric bounds; the upper bound is open for 65+
    pub fn bounds(&self) -> (i32, Option<i32>) {
        match self {
            AgeRange::Age18To29 => (18, Some(29)),
            AgeRange::Age30To49 => (30, Some(49)),
            AgeRange::Age50To64 => (50, Some(64)),
            AgeRange::Age65Plus => (65, None),
        }
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeRange::Age18To29 => write!(f, "18-29"),
            AgeRange::Age30To49 => write!(f, "30-49"),
            AgeRange::Age50To64 => write!(f, "50-64"),
            AgeRange::Age65Plus => write!(f, "65+"),
        }
    }
}

impl std::str::FromStr for AgeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "18-29" => Ok(AgeRange::Age18To29),
            "30-49" => Ok(AgeRange::Age30To49),
            "50-64" => Ok(AgeRange::Age50To64),
            "65+" => Ok(AgeRange::Age65Plus),
            // Model output occasionally writes "65" or "65 and up"
            other if other.starts_with("65") => Ok(AgeRange::Age65Plus),
            other => Err(format!("Unknown age range: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_age_buckets() {
        assert_eq!(AgeRange::from_age(18), Some(AgeRange::Age18To29));
        assert_eq!(AgeRange::from_age(29), Some(AgeRange::Age18To29));
        assert_eq!(AgeRange::from_age(30), Some(AgeRange::Age30To49));
        assert_eq!(AgeRange::from_age(49), Some(AgeRange::Age30To49));
        assert_eq!(AgeRange::from_age(50), Some(AgeRange::Age50To64));
        assert_eq!(AgeRange::from_age(64), Some(AgeRange::Age50To64));
        assert_eq!(AgeRange::from_age(65), Some(AgeRange::Age65Plus));
        assert_eq!(AgeRange::from_age(97), Some(AgeRange::Age65Plus));
    }

    #[test]
    fn test_under_18_has_no_bucket() {
        assert_eq!(AgeRange::from_age(17), None);
        assert_eq!(AgeRange::from_age(0), None);
        assert_eq!(AgeRange::from_age(-3), None);
    }

    #[test]
    fn test_label_round_trip() {
        for range in AgeRange::ALL {
            let parsed: AgeRange = range.to_string().parse().unwrap();
            assert_eq!(parsed, range);
        }
    }

    #[test]
    fn test_tolerates_65_prefix() {
        assert_eq!("65".parse::<AgeRange>().unwrap(), AgeRange::Age65Plus);
        assert_eq!(
            "65 and up".parse::<AgeRange>().unwrap(),
            AgeRange::Age65Plus
        );
        assert!("13-17".parse::<AgeRange>().is_err());
    }

    #[test]
    fn test_bounds_cover_buckets() {
        assert_eq!(AgeRange::Age18To29.bounds(), (18, Some(29)));
        assert_eq!(AgeRange::Age65Plus.bounds(), (65, None));
    }
}
