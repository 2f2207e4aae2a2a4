use sgt_core::errors::{ErrorInfo, SgError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("record", "P 1 2 1")
        .with_context("line", "42")
}

#[test]
fn format_error_surface() {
    let err = SgError::Format(sample_info("F001", "missing field"));
    assert_eq!(err.info().code, "F001");
    assert!(err.info().context.contains_key("line"));
}

#[test]
fn basis_error_surface() {
    let err = SgError::BasisMismatch(sample_info("B001", "operator drift"));
    assert_eq!(err.info().code, "B001");
    assert!(err.to_string().starts_with("basis mismatch: operator drift"));
}

#[test]
fn notation_helper_records_the_notation() {
    let err = SgError::notation("hall-lattice", "unknown lattice symbol", "Q 2");
    assert!(matches!(err, SgError::InvalidNotation(_)));
    assert_eq!(err.info().context.get("notation").map(String::as_str), Some("Q 2"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = SgError::MissingRecord(
        ErrorInfo::new("M001", "no record")
            .with_context("name", "P 1")
            .with_hint("regenerate the database"),
    );
    let text = err.to_string();
    assert!(text.contains("name=P 1"));
    assert!(text.contains("hint: regenerate the database"));
}

#[test]
fn errors_roundtrip_through_json() {
    let err = SgError::CenteringMismatch(sample_info("C001", "centering differs"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"CenteringMismatch\""));
    let back: SgError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}
