//! Transcript assembly.
//!
//! `orderResult` is a JSON string holding a `lattice` array. Each element
//! carries `json_1best` (itself JSON, usually as a string) with the best
//! recognition path under `st.rt[0].ws[]`, and each word slot lists its
//! candidates in `cw[]`.

use serde::Deserialize;

use crate::error::{AsrError, AsrResult};
use crate::types::ResultContent;

#[derive(Debug, Deserialize)]
struct OrderResult {
    lattice: Vec<LatticeElement>,
}

#[derive(Debug, Deserialize)]
struct LatticeElement {
    json_1best: Embedded,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Embedded {
    Text(String),
    Object(OneBest),
}

#[derive(Debug, Deserialize)]
struct OneBest {
    st: Sentence,
}

#[derive(Debug, Deserialize)]
struct Sentence {
    rt: Vec<RecognitionPath>,
}

#[derive(Debug, Deserialize)]
struct RecognitionPath {
    ws: Vec<WordSlot>,
}

#[derive(Debug, Deserialize)]
struct WordSlot {
    cw: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    w: String,
}

/// Flatten a completed job's payload into text.
pub fn assemble_content(content: &ResultContent) -> AsrResult<String> {
    let order_result = content
        .order_result
        .as_deref()
        .ok_or_else(|| AsrError::malformed("orderResult is missing"))?;
    assemble(order_result)
}

/// Flatten an `orderResult` document into text.
///
/// Words of one lattice element are concatenated as-is; elements are joined
/// with a single space.
pub fn assemble(order_result: &str) -> AsrResult<String> {
    let result: OrderResult = serde_json::from_str(order_result)
        .map_err(|e| AsrError::malformed(format!("orderResult: {}", e)))?;

    let segments = result
        .lattice
        .into_iter()
        .enumerate()
        .map(|(i, element)| segment_text(element).map_err(|e| prefix(i, e)))
        .collect::<AsrResult<Vec<_>>>()?;

    Ok(segments.join(" "))
}

fn segment_text(element: LatticeElement) -> AsrResult<String> {
    let best = match element.json_1best {
        Embedded::Object(best) => best,
        Embedded::Text(raw) => serde_json::from_str::<OneBest>(&raw)
            .map_err(|e| AsrError::malformed(format!("json_1best: {}", e)))?,
    };

    let path = best
        .st
        .rt
        .into_iter()
        .next()
        .ok_or_else(|| AsrError::malformed("st.rt is empty"))?;

    path.ws
        .into_iter()
        .enumerate()
        .map(|(j, slot)| {
            slot.cw
                .into_iter()
                .next()
                .map(|c| c.w)
                .ok_or_else(|| AsrError::malformed(format!("ws[{}].cw is empty", j)))
        })
        .collect()
}

fn prefix(index: usize, err: AsrError) -> AsrError {
    match err {
        AsrError::MalformedPayload(msg) => {
            AsrError::malformed(format!("lattice[{}]: {}", index, msg))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Build an `orderResult` string the way the service encodes it.
    fn order_result(segments: &[&[&str]]) -> String {
        let lattice: Vec<_> = segments
            .iter()
            .map(|words| {
                let ws: Vec<_> = words
                    .iter()
                    .map(|w| json!({"cw": [{"w": w, "wp": "n"}, {"w": "alt"}], "wb": 1, "we": 2}))
                    .collect();
                let best = json!({"st": {"bg": "0", "ed": "100", "rt": [{"ws": ws}]}});
                json!({"json_1best": best.to_string()})
            })
            .collect();
        json!({"lattice": lattice}).to_string()
    }

    #[test]
    fn test_two_segments() {
        let text = assemble(&order_result(&[&["He", "llo"], &["Wor", "ld"]])).unwrap();
        assert_eq!(text, "Hello World");
    }

    #[test]
    fn test_keeps_order_and_whitespace() {
        let text = assemble(&order_result(&[&["a ", "a"], &[], &["b"]])).unwrap();
        assert_eq!(text, "a a  b");
    }

    #[test]
    fn test_empty_lattice() {
        assert_eq!(assemble(r#"{"lattice": []}"#).unwrap(), "");
    }

    #[test]
    fn test_accepts_embedded_object() {
        let doc = json!({"lattice": [{"json_1best": {"st": {"rt": [{"ws": [{"cw": [{"w": "hi"}]}]}]}}}]});
        assert_eq!(assemble(&doc.to_string()).unwrap(), "hi");
    }

    #[test]
    fn test_missing_lattice_fails() {
        let err = assemble(r#"{"lattice2": []}"#).unwrap_err();
        assert!(matches!(err, AsrError::MalformedPayload(_)));
    }

    #[test]
    fn test_empty_candidates_fail_whole_assembly() {
        let best = json!({"st": {"rt": [{"ws": [{"cw": [{"w": "ok"}]}, {"cw": []}]}]}});
        let doc = json!({"lattice": [
            {"json_1best": json!({"st": {"rt": [{"ws": [{"cw": [{"w": "fine"}]}]}]}}).to_string()},
            {"json_1best": best.to_string()}
        ]});
        match assemble(&doc.to_string()) {
            Err(AsrError::MalformedPayload(msg)) => assert_eq!(msg, "lattice[1]: ws[1].cw is empty"),
            other => panic!("expected malformed payload, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_recognition_paths_fail() {
        let doc = json!({"lattice": [{"json_1best": json!({"st": {"rt": []}}).to_string()}]});
        assert!(matches!(
            assemble(&doc.to_string()),
            Err(AsrError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_missing_order_result() {
        let content = ResultContent {
            order_info: None,
            order_result: None,
            task_estimate_time: None,
        };
        assert!(matches!(
            assemble_content(&content),
            Err(AsrError::MalformedPayload(_))
        ));
    }
}
