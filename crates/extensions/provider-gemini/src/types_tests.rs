    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateContentRequest::from_text("Hello");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, json!({"contents": [{"parts": [{"text": "Hello"}]}]}));
    }

    #[test]
    fn test_first_text_single_part() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Better prompt"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 8, "totalTokenCount": 48}
        }))
        .unwrap();

        assert_eq!(response.first_text().as_deref(), Some("Better prompt"));
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 48);
    }

    #[test]
    fn test_first_text_joins_parts_and_skips_non_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Part one. "},
                    {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                    {"text": "Part two."}
                ]}
            }]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("Part one. Part two."));
    }

    #[test]
    fn test_first_text_uses_first_candidate_only() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("first"));
    }

    #[test]
    fn test_first_text_missing_pieces() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"role": "model"}}]}),
        ] {
            let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
            assert_eq!(response.first_text(), None);
        }
    }

    #[test]
    fn test_error_body() {
        let error: GeminiError = serde_json::from_value(json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        }))
        .unwrap();
        assert_eq!(error.error.code, 400);
        assert_eq!(error.error.status, "INVALID_ARGUMENT");
    }
