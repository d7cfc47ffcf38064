// src/types/analysis.rs
//! Analysis payloads returned by the resume analysis service

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ClientError;
use crate::types::response::embedded_error;

// ===== AnalysisResult =====

/// Result of `POST /analyze`.
///
/// Only the fields every service version emits are required. The richer
/// fields added by later service versions default to empty so that older
/// responses still decode and render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text_snippet: String,
    pub skills_detected: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills_by_category: BTreeMap<String, Vec<CategorizedSkill>>,
    pub found_sections: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_sections: Vec<String>,
    pub completeness: f64,
    #[serde(default)]
    pub ats_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ats_checks: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyword_analysis: BTreeMap<String, KeywordStat>,
    #[serde(default)]
    pub content_analysis: Option<ContentAnalysis>,
    pub suggestions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_words: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedSkill {
    pub skill: String,
    /// Detection confidence, nominally in `[0, 1]`.
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<String>,
    #[serde(default)]
    pub variations_found: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordStat {
    pub count: u32,
    /// Occurrences per hundred words.
    pub density: f64,
    /// Score out of 100.
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub word_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_verb_count: u32,
    #[serde(default, deserialize_with = "null_as_default", alias = "quantifiable_count")]
    pub number_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<String>,
}

impl AnalysisResult {
    pub fn ats_checks_passed(&self) -> usize {
        self.ats_checks.values().filter(|passed| **passed).count()
    }

    pub fn categorized_skill_count(&self) -> usize {
        self.skills_by_category.values().map(Vec::len).sum()
    }

    /// Content analysis, or an all-zero record when the service omitted it.
    pub fn content(&self) -> ContentAnalysis {
        self.content_analysis.clone().unwrap_or_default()
    }
}

/// Treats an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ===== AnalysisPayload =====

/// A decoded analysis together with the exact JSON it was decoded from.
///
/// The raw value is kept so the analysis can be re-exported without losing
/// fields this client does not model.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPayload {
    pub result: AnalysisResult,
    pub raw: Value,
}

impl AnalysisPayload {
    pub fn from_value(endpoint: &'static str, raw: Value) -> Result<Self, ClientError> {
        if let Some(message) = embedded_error(&raw) {
            return Err(ClientError::Service { endpoint, message });
        }

        let result = serde_json::from_value(raw.clone())
            .map_err(|source| ClientError::Decode { endpoint, source })?;

        Ok(Self { result, raw })
    }

    /// Pretty-printed JSON of the raw payload, as written to export files.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, ClientError> {
        pretty_json(&self.raw)
    }
}

pub fn pretty_json(value: &Value) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec_pretty(value).map_err(|source| ClientError::Decode {
        endpoint: "local export",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "text_snippet": "Jane Doe\nExperience",
            "skills_detected": ["python", "docker"],
            "found_sections": ["experience"],
            "completeness": 42,
            "suggestions": ["Add summary section"]
        })
    }

    #[test]
    fn test_minimal_response_defaults_optional_fields() {
        let payload = AnalysisPayload::from_value("/analyze", minimal()).unwrap();
        let result = payload.result;

        assert!(result.missing_sections.is_empty());
        assert!(result.skills_by_category.is_empty());
        assert!(result.ats_checks.is_empty());
        assert!(result.keyword_analysis.is_empty());
        assert!(result.content_analysis.is_none());
        assert_eq!(result.ats_score, None);
        assert_eq!(result.content().word_count, 0);
        assert_eq!(result.ats_checks_passed(), 0);
        assert_eq!(result.completeness, 42.0);
    }

    #[test]
    fn test_full_response_decodes() {
        let raw = json!({
            "text_snippet": "...",
            "skills_detected": ["python"],
            "skills_by_category": {
                "Programming Languages": [
                    {"skill": "python", "confidence": 0.8, "matches": ["python"], "variations_found": 1}
                ]
            },
            "found_sections": ["skills"],
            "missing_sections": ["projects", "summary"],
            "completeness": 73.5,
            "ats_score": 75,
            "ats_checks": {"has_summary": false, "has_skills_section": true},
            "keyword_analysis": {"software": {"count": 3, "density": 1.2, "score": 12.0}},
            "content_analysis": {"word_count": 320, "action_verb_count": 4, "number_count": 6, "issues": ["Low keyword density"]},
            "suggestions": [],
            "top_words": [["python", 5], ["data", 3]],
            "extra_field": true
        });

        let payload = AnalysisPayload::from_value("/analyze", raw.clone()).unwrap();
        let result = &payload.result;

        assert_eq!(result.ats_score, Some(75.0));
        assert_eq!(result.categorized_skill_count(), 1);
        assert_eq!(result.ats_checks_passed(), 1);
        assert_eq!(result.keyword_analysis["software"].count, 3);
        assert_eq!(result.content().issues, vec!["Low keyword density"]);
        assert_eq!(result.top_words[0], ("python".to_string(), 5));
        assert_eq!(payload.raw, raw);
    }

    #[test]
    fn test_null_optional_fields_decode_as_empty() {
        let mut raw = minimal();
        let object = raw.as_object_mut().unwrap();
        for field in [
            "skills_by_category",
            "missing_sections",
            "ats_score",
            "ats_checks",
            "keyword_analysis",
            "top_words",
        ] {
            object.insert(field.to_string(), Value::Null);
        }
        object.insert(
            "content_analysis".to_string(),
            json!({"word_count": null, "action_verb_count": null, "number_count": null, "issues": null}),
        );

        let payload = AnalysisPayload::from_value("/analyze", raw).unwrap();
        let result = &payload.result;

        assert!(result.missing_sections.is_empty());
        assert!(result.skills_by_category.is_empty());
        assert!(result.ats_checks.is_empty());
        assert!(result.keyword_analysis.is_empty());
        assert!(result.top_words.is_empty());
        assert_eq!(result.ats_score, None);
        assert_eq!(result.content(), ContentAnalysis::default());

        for tab in crate::report::Tab::ALL {
            assert!(!crate::report::render_tab(result, tab).is_empty());
        }
    }

    #[test]
    fn test_null_skill_matches_decode_as_empty() {
        let skill: CategorizedSkill = serde_json::from_value(
            json!({"skill": "rust", "confidence": 0.9, "matches": null, "variations_found": null}),
        )
        .unwrap();
        assert!(skill.matches.is_empty());
        assert_eq!(skill.variations_found, None);
    }

    #[test]
    fn test_quantifiable_count_alias() {
        let content: ContentAnalysis =
            serde_json::from_value(json!({"word_count": 10, "quantifiable_count": 2})).unwrap();
        assert_eq!(content.number_count, 2);
        assert!(content.issues.is_empty());
    }

    #[test]
    fn test_embedded_error_is_service_error() {
        let err = AnalysisPayload::from_value(
            "/analyze",
            json!({"error": "Unsupported file type. Use PDF or DOCX."}),
        )
        .unwrap_err();

        match err {
            ClientError::Service { endpoint, message } => {
                assert_eq!(endpoint, "/analyze");
                assert!(message.contains("Unsupported file type"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_field_is_decode_error() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("skills_detected");

        let err = AnalysisPayload::from_value("/analyze", raw).unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn test_pretty_json_matches_reencoded_original() {
        let text = r#"{"text_snippet":"x","skills_detected":[],"found_sections":[],"completeness":10,"suggestions":[],"zeta":1,"alpha":2}"#;
        let original: Value = serde_json::from_str(text).unwrap();
        let payload = AnalysisPayload::from_value("/analyze", original.clone()).unwrap();

        let bytes = payload.to_pretty_json().unwrap();
        assert_eq!(bytes, serde_json::to_vec_pretty(&original).unwrap());

        let reparsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reparsed, original);
    }
}
