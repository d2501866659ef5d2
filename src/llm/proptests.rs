//! Property-based tests for the Gemini translation layer
//!
//! - Responses without usable text are rejected
//! - Text is preserved, in order, through normalization
//! - Request translation never emits empty contents for non-empty input

use super::gemini::{
    GeminiCandidate, GeminiContent, GeminiPart, GeminiResponse, GeminiService,
};
use super::types::LlmRequest;
use super::GatewayErrorKind;
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.!?,*]{1,80}".prop_filter("needs a visible character", |s| {
        !s.trim().is_empty()
    })
}

fn response_with_parts(parts: Vec<Option<String>>, finish: Option<&str>) -> GeminiResponse {
    GeminiResponse {
        candidates: vec![GeminiCandidate {
            content: Some(GeminiContent {
                role: Some("model".to_string()),
                parts: parts.into_iter().map(|text| GeminiPart { text }).collect(),
            }),
            finish_reason: finish.map(str::to_string),
        }],
        usage_metadata: None,
    }
}

proptest! {
    #[test]
    fn normalize_preserves_text_order(parts in proptest::collection::vec(arb_text(), 1..6)) {
        let expected = parts.concat();
        let resp = response_with_parts(parts.into_iter().map(Some).collect(), Some("STOP"));

        let out = GeminiService::normalize_response(resp).unwrap();
        prop_assert_eq!(out.text(), expected);
        prop_assert!(out.finished);
    }

    #[test]
    fn normalize_rejects_whitespace_only(
        parts in proptest::collection::vec(prop_oneof![
            Just(None),
            Just(Some(String::new())),
            "[ \t\n]{1,5}".prop_map(Some),
        ], 0..5)
    ) {
        let resp = response_with_parts(parts, Some("STOP"));
        let err = GeminiService::normalize_response(resp).unwrap_err();
        prop_assert_eq!(err.kind, GatewayErrorKind::EmptyResponse);
    }

    #[test]
    fn non_text_parts_are_skipped(text in arb_text(), gaps in 0usize..4) {
        let mut parts: Vec<Option<String>> = vec![None; gaps];
        parts.push(Some(text.clone()));
        let resp = response_with_parts(parts, None);

        let out = GeminiService::normalize_response(resp).unwrap();
        prop_assert_eq!(out.text(), text);
        prop_assert!(!out.finished);
    }

    #[test]
    fn translated_request_carries_prompt(system in proptest::option::of(arb_text()), text in arb_text()) {
        let request = LlmRequest::single_turn(system.as_deref(), text.clone());
        let wire = GeminiService::translate_request(&request);

        prop_assert_eq!(wire.contents.len(), 1);
        prop_assert_eq!(wire.contents[0].role.as_deref(), Some("user"));
        prop_assert_eq!(wire.contents[0].parts[0].text.as_deref(), Some(text.as_str()));
        prop_assert_eq!(wire.system_instruction.is_some(), system.is_some());
        prop_assert!(wire.generation_config.is_none());
    }
}
