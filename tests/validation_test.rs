use trellis::error::TrellisError;
use trellis::validation::{NamespaceValidator, DEFAULT_MESSAGE};

fn messages(value: &str) -> Vec<String> {
    match NamespaceValidator::new().validate(value) {
        Err(TrellisError::ValidationError { messages, .. }) => messages,
        other => panic!("Expected ValidationError for {value:?}, got {other:?}"),
    }
}

#[test]
fn test_valid_namespaces() {
    let validator = NamespaceValidator::new();
    for value in ["", "App", "App\\Models", "\\App\\Models", "my_app\\v2\\Http_Controllers"] {
        assert!(validator.validate(value).unwrap(), "{value:?} should be valid");
    }
}

#[test]
fn test_invalid_namespaces() {
    for value in ["1App", "App\\\\Models", "App\\", "\\\\App", "App-Models", "App\\_Models", " "] {
        let messages = messages(value);
        assert!(!messages.is_empty());
        assert_eq!(messages[0], DEFAULT_MESSAGE);
    }
}

#[test]
fn test_every_violation_is_reported() {
    let messages = messages("1App\\\\Mod-els");
    assert_eq!(
        messages,
        vec![
            DEFAULT_MESSAGE.to_string(),
            "Segment '1App' must start with a letter".to_string(),
            "Segment 2 is empty".to_string(),
            "Segment 'Mod-els' contains illegal character '-'".to_string(),
        ]
    );
}

#[test]
fn test_empty_not_allowed() {
    let validator = NamespaceValidator::new().allow_empty(false);
    assert!(validator.validate("").is_err());
}

#[test]
fn test_custom_message_and_label() {
    let validator = NamespaceValidator::new().label("Models namespace").message(":field must be a valid namespace");
    match validator.validate("9") {
        Err(err @ TrellisError::ValidationError { .. }) => {
            assert!(err.to_string().starts_with("Models namespace must be a valid namespace\n"));
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}
