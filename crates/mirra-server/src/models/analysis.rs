//! Analysis DTOs - the /mirra/analyze contract
//!
//! The response keys (`would_buy_pie`, `yes_pie`, `age_distribution`,
//! `consumer_insights`, `demographics`) are the frontend contract; serde
//! renames keep the age-bucket wire labels stable.

use std::collections::BTreeMap;

use mirra::{AgeRange, AnalysisReport};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::analysis::{age_distribution, archetype_distribution, count_decisions};

/// Analyze request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub product_description: String,
}

/// Yes/no purchase decision counts
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct WouldBuyCounts {
    pub yes: usize,
    pub no: usize,
}

/// Decision counts bucketed by age
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct AgeDistributionResponse {
    #[serde(rename = "18-29")]
    pub age_18_29: usize,
    #[serde(rename = "30-49")]
    pub age_30_49: usize,
    #[serde(rename = "50-64")]
    pub age_50_64: usize,
    #[serde(rename = "65+")]
    pub age_65_plus: usize,
}

/// Insights for one representative consumer of an archetype
#[derive(Debug, Serialize, ToSchema)]
pub struct ConsumerInsightResponse {
    pub persona_id: Uuid,
    /// LLM-authored markdown
    pub insights: String,
}

/// Target demographics echoed back to the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct DemographicsResponse {
    pub target_age_ranges: Vec<String>,
    pub target_gender: String,
}

/// Analyze response
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub would_buy_pie: WouldBuyCounts,
    /// "yes" persona count per archetype; every archetype is present
    pub yes_pie: BTreeMap<String, usize>,
    pub age_distribution: AgeDistributionResponse,
    /// One representative consumer per archetype that attracted buyers
    pub consumer_insights: BTreeMap<String, ConsumerInsightResponse>,
    pub demographics: DemographicsResponse,
}

impl AnalyzeResponse {
    /// Assemble the wire response from a pipeline report
    pub fn from_report(report: &AnalysisReport) -> Self {
        let (yes, no) = count_decisions(&report.decisions);

        let ages = age_distribution(&report.decisions);
        let age_distribution = AgeDistributionResponse {
            age_18_29: ages.get(&AgeRange::Age18To29).copied().unwrap_or(0),
            age_30_49: ages.get(&AgeRange::Age30To49).copied().unwrap_or(0),
            age_50_64: ages.get(&AgeRange::Age50To64).copied().unwrap_or(0),
            age_65_plus: ages.get(&AgeRange::Age65Plus).copied().unwrap_or(0),
        };

        let consumer_insights = report
            .insights
            .iter()
            .map(|insight| {
                (
                    insight.archetype.clone(),
                    ConsumerInsightResponse {
                        persona_id: insight.persona_id,
                        insights: insight.insights.clone(),
                    },
                )
            })
            .collect();

        Self {
            would_buy_pie: WouldBuyCounts { yes, no },
            yes_pie: archetype_distribution(&report.profile.archetypes, &report.assignments),
            age_distribution,
            consumer_insights,
            demographics: DemographicsResponse {
                target_age_ranges: report
                    .profile
                    .age_ranges
                    .iter()
                    .map(|r| r.to_string())
                    .collect(),
                target_gender: report.profile.gender.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirra::{
        ArchetypeAssignment, ConsumerInsight, Decision, DecisionRecord, ProductProfile,
        TargetGender,
    };

    fn record(decision: Decision, age: i32) -> DecisionRecord {
        DecisionRecord {
            persona_id: Uuid::new_v4(),
            decision,
            reason: "test".to_string(),
            age,
            persona_summary: "summary".to_string(),
        }
    }

    #[test]
    fn test_from_report_builds_frontend_contract() {
        let buyer = record(Decision::Yes, 34);
        let report = AnalysisReport {
            sketches: vec![],
            profile: ProductProfile {
                archetypes: vec!["Active Minimalist".to_string(), "Trend Seeker".to_string()],
                age_ranges: vec![AgeRange::Age18To29, AgeRange::Age30To49],
                gender: TargetGender::Both,
            },
            top_matches: vec![],
            decisions: vec![buyer.clone(), record(Decision::No, 22), record(Decision::No, 71)],
            assignments: vec![ArchetypeAssignment {
                persona_id: buyer.persona_id,
                archetype: "Active Minimalist".to_string(),
            }],
            insights: vec![ConsumerInsight {
                persona_id: buyer.persona_id,
                archetype: "Active Minimalist".to_string(),
                insights: "## Why they buy".to_string(),
            }],
            errors: vec![],
        };

        let response = AnalyzeResponse::from_report(&report);

        assert_eq!(response.would_buy_pie.yes, 1);
        assert_eq!(response.would_buy_pie.no, 2);
        assert_eq!(response.yes_pie["Active Minimalist"], 1);
        assert_eq!(response.yes_pie["Trend Seeker"], 0);
        assert_eq!(response.age_distribution.age_18_29, 1);
        assert_eq!(response.age_distribution.age_30_49, 1);
        assert_eq!(response.age_distribution.age_65_plus, 1);
        assert_eq!(
            response.demographics.target_age_ranges,
            vec!["18-29".to_string(), "30-49".to_string()]
        );
        assert_eq!(response.demographics.target_gender, "both");
        assert!(response.consumer_insights.contains_key("Active Minimalist"));
    }

    #[test]
    fn test_age_bucket_labels_serialize_as_wire_keys() {
        let json = serde_json::to_value(AgeDistributionResponse {
            age_18_29: 1,
            age_30_49: 2,
            age_50_64: 3,
            age_65_plus: 4,
        })
        .unwrap();
        assert_eq!(json["18-29"], 1);
        assert_eq!(json["30-49"], 2);
        assert_eq!(json["50-64"], 3);
        assert_eq!(json["65+"], 4);
    }
}
