//! Strict decoding of model output into [`AnalysisResult`].

use serde::Deserialize;

use crate::{error::GatewayError, types::AnalysisResult};

/// Extract a JSON object from markdown code blocks or raw text
///
/// Handles:
/// - ```json blocks
/// - Generic ``` blocks
/// - Raw text with surrounding prose (outermost `{ ... }`)
pub fn extract_json(text: &str) -> Option<&str> {
    let body = if let Some(start) = text.find("```json") {
        fenced(text, start + 7)
    } else if let Some(start) = text.find("```") {
        fenced(text, start + 3)
    } else {
        text
    };

    let open = body.find('{')?;
    let close = body.rfind('}')?;
    if close < open {
        return None;
    }
    Some(&body[open..=close])
}

fn fenced(text: &str, start: usize) -> &str {
    let rest = &text[start..];
    match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Wire shape of a model answer; `summary` is mandatory
#[derive(Deserialize)]
struct Envelope {
    #[allow(dead_code)]
    summary: String,
}

/// Decode model text into a result, or fail with [`GatewayError::Decode`]
pub fn decode_analysis(text: &str) -> Result<AnalysisResult, GatewayError> {
    let json = extract_json(text)
        .ok_or_else(|| GatewayError::Decode("no JSON object in response".to_string()))?;

    serde_json::from_str::<Envelope>(json)
        .map_err(|e| GatewayError::Decode(format!("missing required fields: {}", e)))?;

    let mut result: AnalysisResult =
        serde_json::from_str(json).map_err(|e| GatewayError::Decode(e.to_string()))?;

    result.confidence_score = result.confidence_score.map(clamp_score);
    result.sentiment_score = result.sentiment_score.map(clamp_score);
    // Error state is owned by the executor, never by the provider
    result.error = false;
    result.error_message = None;

    Ok(result)
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 10.0)
    }
}
