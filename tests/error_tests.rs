//! Tests for the error system.

use palaver::error::*;

#[test]
fn error_api_creation() {
    let err = PalaverError::api(404, "Not found");
    assert!(matches!(&err, PalaverError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API error (status 404): Not found");
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: PalaverError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: PalaverError::Authentication("bad-key".to_string()),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: PalaverError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: PalaverError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::IncreaseTimeout,
        },
        Case {
            error: PalaverError::Configuration("bad-config".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: PalaverError::api(502, "bad gateway"),
            expected_category: ErrorCategory::Server,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: PalaverError::api(400, "bad request"),
            expected_category: ErrorCategory::Api,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: PalaverError::Stream("cut".to_string()),
            expected_category: ErrorCategory::Stream,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: PalaverError::Io(io_error),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: PalaverError::Serialization(serde_error),
            expected_category: ErrorCategory::Serialization,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category, "{}", case.error);
        assert_eq!(case.error.is_retryable(), case.expected_retryable, "{}", case.error);
        assert_eq!(
            case.error.recovery_suggestion(),
            case.expected_recovery,
            "{}",
            case.error
        );
    }
}

#[test]
fn remote_call_wraps_and_classifies_like_its_source() {
    let err = PalaverError::remote_call(
        ModelCallPhase::Initial,
        PalaverError::Authentication("revoked".into()),
    );
    assert!(err.is_remote_call_failure());
    assert_eq!(err.category(), ErrorCategory::Authentication);
    assert!(!err.is_retryable());
    assert!(std::error::Error::source(&err).is_some());
    assert!(!PalaverError::Timeout(1).is_remote_call_failure());
}

#[test]
fn tool_error_messages_name_their_kind() {
    let err = ToolError::MalformedArguments {
        tool: "add".into(),
        reason: "trailing comma at line 1 column 9".into(),
    };
    assert_eq!(
        err.to_string(),
        "MalformedArguments: arguments for 'add' are not a valid JSON object: trailing comma at line 1 column 9"
    );
    assert_eq!(
        ToolError::UnknownTool { name: "x".into() }.to_string(),
        "UnknownTool: no tool named 'x' is registered"
    );
}
