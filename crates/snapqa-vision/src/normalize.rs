//! Response normalization
//!
//! The inference service returns free-form text that is *supposed* to be
//! structured but is not guaranteed to be. Extraction is a chain of pure
//! attempt-functions with first-success-wins semantics:
//!
//! 1. parse the transport envelope and pull out `choices[0].message.content`
//!    (structural failure here is the one fatal case),
//! 2. parse the content itself as JSON (object or array of objects),
//! 3. split on the `Answer:` delimiter convention,
//! 4. keep the whole content as the answer with an empty question.
//!
//! Whatever layer wins, candidates go through a final sanitation pass, so
//! the model's output is never silently discarded and nothing unstorable
//! gets through.

use serde::Deserialize;
use serde_json::Value;
use snapqa_core::models::QnaPair;
use snapqa_core::AppError;

// Transport envelope structures (OpenAI-style chat completion)
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Turn a raw inference response body into zero or more storable pairs.
///
/// Pure: identical input yields identical output.
pub fn normalize(raw: &str) -> Result<Vec<QnaPair>, AppError> {
    let content = extract_content(raw)?;
    let candidates = attempt_structured(&content)
        .or_else(|| attempt_heuristic_split(&content).map(|pair| vec![pair]))
        .unwrap_or_else(|| vec![fallback_raw(&content)]);
    Ok(sanitize(candidates))
}

/// Layer 1: parse the outer envelope and extract the content field.
pub fn extract_content(raw: &str) -> Result<String, AppError> {
    let envelope: ChatCompletion = serde_json::from_str(raw)
        .map_err(|e| AppError::InvalidUpstreamEnvelope(format!("not a chat completion: {}", e)))?;

    envelope
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| AppError::InvalidUpstreamEnvelope("response has no choices".to_string()))
}

/// Layer 2: the content itself is JSON - a `{question, answer}` object or an
/// array of such objects. Markdown code fences around the JSON are stripped
/// first.
pub fn attempt_structured(text: &str) -> Option<Vec<QnaPair>> {
    let value: Value = serde_json::from_str(strip_code_fence(text)).ok()?;
    match value {
        Value::Object(map) => pair_from_object(&map).map(|pair| vec![pair]),
        Value::Array(items) => {
            let pairs: Vec<QnaPair> = items
                .iter()
                .filter_map(|item| item.as_object().and_then(pair_from_object))
                .collect();
            if pairs.is_empty() {
                None
            } else {
                Some(pairs)
            }
        }
        _ => None,
    }
}

/// Layer 3: plain-prose responses following the `Question: ... Answer: ...`
/// delimiter convention.
pub fn attempt_heuristic_split(text: &str) -> Option<QnaPair> {
    let (before, after) = text.split_once("Answer:")?;
    let question = before.trim();
    let question = question.strip_prefix("Question:").unwrap_or(question).trim();
    Some(QnaPair {
        question: question.to_string(),
        answer: after.trim().to_string(),
    })
}

/// Layer 4: every structural expectation was violated; keep the whole text
/// as the answer so the model's output is not lost.
pub fn fallback_raw(text: &str) -> QnaPair {
    QnaPair {
        question: String::new(),
        answer: text.trim().to_string(),
    }
}

/// Extract JSON from markdown code blocks if present.
fn strip_code_fence(text: &str) -> &str {
    if text.contains("```json") {
        text.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else if text.contains("```") {
        text.split("```")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else {
        text.trim()
    }
}

/// An object counts as a candidate when it carries at least one of the
/// expected keys; non-string and missing fields coerce to empty strings.
fn pair_from_object(obj: &serde_json::Map<String, Value>) -> Option<QnaPair> {
    if !obj.contains_key("question") && !obj.contains_key("answer") {
        return None;
    }
    Some(QnaPair {
        question: string_or_empty(obj.get("question")),
        answer: string_or_empty(obj.get("answer")),
    })
}

fn string_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Final pass over every candidate: trim whitespace and drop entries where
/// both fields are empty (nothing worth storing).
fn sanitize(candidates: Vec<QnaPair>) -> Vec<QnaPair> {
    candidates
        .into_iter()
        .map(|pair| QnaPair {
            question: pair.question.trim().to_string(),
            answer: pair.answer.trim().to_string(),
        })
        .filter(|pair| !(pair.question.is_empty() && pair.answer.is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"content": content}}]
        })
        .to_string()
    }

    #[test]
    fn test_structured_single_object() {
        let raw = envelope(r#"{"question":"Q","answer":"A"}"#);
        let pairs = normalize(&raw).unwrap();
        assert_eq!(
            pairs,
            vec![QnaPair {
                question: "Q".to_string(),
                answer: "A".to_string()
            }]
        );
    }

    #[test]
    fn test_structured_array_preserves_order() {
        let raw = envelope(
            r#"[{"question":"Q1","answer":"A1"},{"question":"Q2","answer":"A2"}]"#,
        );
        let pairs = normalize(&raw).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "Q1");
        assert_eq!(pairs[1].question, "Q2");
    }

    #[test]
    fn test_structured_inside_markdown_fence() {
        let content = "Here you go:\n```json\n{\"question\":\"Q\",\"answer\":\"A\"}\n```\n";
        let pairs = normalize(&envelope(content)).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].answer, "A");
    }

    #[test]
    fn test_structured_coerces_non_string_fields() {
        let raw = envelope(r#"{"question":42,"answer":"A"}"#);
        let pairs = normalize(&raw).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "");
        assert_eq!(pairs[0].answer, "A");
    }

    #[test]
    fn test_heuristic_split() {
        let raw = envelope("Question: What color? Answer: Blue");
        let pairs = normalize(&raw).unwrap();
        assert_eq!(
            pairs,
            vec![QnaPair {
                question: "What color?".to_string(),
                answer: "Blue".to_string()
            }]
        );
    }

    #[test]
    fn test_heuristic_split_without_question_prefix() {
        let pair = attempt_heuristic_split("What is shown here? Answer: A cat").unwrap();
        assert_eq!(pair.question, "What is shown here?");
        assert_eq!(pair.answer, "A cat");
    }

    #[test]
    fn test_fallback_keeps_full_prose() {
        let raw = envelope("The image shows a sunset over the ocean.");
        let pairs = normalize(&raw).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "");
        assert_eq!(pairs[0].answer, "The image shows a sunset over the ocean.");
    }

    #[test]
    fn test_unparseable_envelope_is_fatal() {
        let err = normalize("definitely not json").unwrap_err();
        assert!(matches!(err, AppError::InvalidUpstreamEnvelope(_)));
    }

    #[test]
    fn test_envelope_without_choices_is_fatal() {
        let err = normalize(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidUpstreamEnvelope(_)));
    }

    #[test]
    fn test_envelope_missing_content_is_fatal() {
        let err = normalize(r#"{"choices":[{"message":{}}]}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidUpstreamEnvelope(_)));
    }

    #[test]
    fn test_sanitation_drops_fully_empty_pairs() {
        let raw = envelope(r#"{"question":"  ","answer":""}"#);
        let pairs = normalize(&raw).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_sanitation_trims_whitespace() {
        let raw = envelope(r#"{"question":"  Q  ","answer":"  A  "}"#);
        let pairs = normalize(&raw).unwrap();
        assert_eq!(pairs[0].question, "Q");
        assert_eq!(pairs[0].answer, "A");
    }

    #[test]
    fn test_normalize_is_pure() {
        let raw = envelope("Question: Q Answer: A");
        assert_eq!(normalize(&raw).unwrap(), normalize(&raw).unwrap());
    }

    #[test]
    fn test_heuristic_requires_marker() {
        assert!(attempt_heuristic_split("no marker here").is_none());
    }

    #[test]
    fn test_structured_rejects_scalar_json() {
        assert!(attempt_structured("\"just a string\"").is_none());
        assert!(attempt_structured("42").is_none());
    }
}
