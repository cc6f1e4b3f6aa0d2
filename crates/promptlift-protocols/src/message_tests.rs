    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_prompt_wire_shape() {
        let value = serde_json::to_value(RelayRequest::GetPrompt).unwrap();
        assert_eq!(value, json!({"action": "getPrompt"}));
    }

    #[test]
    fn test_set_prompt_wire_shape() {
        let request = RelayRequest::SetPrompt {
            enhanced_prompt: "better".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"action": "setPrompt", "enhancedPrompt": "better"}));
    }

    #[test]
    fn test_parse_set_prompt() {
        let request: RelayRequest =
            serde_json::from_value(json!({"action": "setPrompt", "enhancedPrompt": "x"})).unwrap();
        assert_eq!(
            request,
            RelayRequest::SetPrompt {
                enhanced_prompt: "x".to_string()
            }
        );
        assert_eq!(request.action(), "setPrompt");
    }

    #[test]
    fn test_parse_unknown_action_fails() {
        let result: Result<RelayRequest, _> =
            serde_json::from_value(json!({"action": "deletePrompt"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_set_prompt_requires_payload() {
        let result: Result<RelayRequest, _> = serde_json::from_value(json!({"action": "setPrompt"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(
            serde_json::to_value(RelayResponse::prompt("fix my code")).unwrap(),
            json!({"prompt": "fix my code"})
        );
        assert_eq!(
            serde_json::to_value(RelayResponse::success()).unwrap(),
            json!({"success": true})
        );
        assert_eq!(
            serde_json::to_value(RelayResponse::error(NOT_FOUND)).unwrap(),
            json!({"error": "not found"})
        );
    }

    #[test]
    fn test_response_parse_by_field() {
        let prompt: RelayResponse = serde_json::from_value(json!({"prompt": "p"})).unwrap();
        assert_eq!(prompt, RelayResponse::prompt("p"));

        let success: RelayResponse = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(success, RelayResponse::success());

        let error: RelayResponse = serde_json::from_value(json!({"error": "could not set"})).unwrap();
        assert!(error.is_error());
    }

    #[test]
    fn test_into_prompt_trims() {
        let text = RelayResponse::prompt("  spaced  ").into_prompt().unwrap();
        assert_eq!(text.as_str(), "spaced");
    }

    #[test]
    fn test_into_prompt_error() {
        let err = RelayResponse::error(NOT_FOUND).into_prompt().unwrap_err();
        assert_eq!(err, RelayError::Remote("not found".to_string()));
    }

    #[test]
    fn test_into_prompt_wrong_shape() {
        let err = RelayResponse::success().into_prompt().unwrap_err();
        assert!(matches!(err, RelayError::Protocol(_)));
    }

    #[test]
    fn test_into_success() {
        assert!(RelayResponse::success().into_success().is_ok());
        assert!(RelayResponse::Success { success: false }.into_success().is_err());
        assert!(RelayResponse::error(COULD_NOT_SET).into_success().is_err());
    }

    #[test]
    fn test_text_updated_notification() {
        let note = PageNotification::TextUpdated {
            text: "typing".to_string(),
        };
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value, json!({"action": "textUpdated", "text": "typing"}));
    }
