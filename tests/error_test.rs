use std::io;
use std::path::PathBuf;

use trellis::error::{ErrorKind, ErrorReport, TrellisError};

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let err: TrellisError = io_err.into();

    match err {
        TrellisError::FileSystemError(inner) => {
            assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied)
        }
        _ => panic!("Expected FileSystemError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = TrellisError::ConfigNotFound {
        scanned: vec![PathBuf::from("/srv/app/config"), PathBuf::from("/srv/config")],
    };
    assert_eq!(
        err.to_string(),
        "Configuration file couldn't be loaded! Scanned paths: /srv/app/config, /srv/config"
    );

    let err = TrellisError::ValidationError {
        field: "namespace".to_string(),
        messages: vec!["first".to_string(), "second".to_string()],
    };
    assert_eq!(err.to_string(), "first\nsecond");

    let err = TrellisError::UnsupportedAdapterError("Oracle".to_string());
    assert_eq!(err.to_string(), "Adapter Oracle is not supported");
}

#[test]
fn test_error_report() {
    let err = TrellisError::ConfigNotFound { scanned: vec![PathBuf::from("/srv/app/config")] };
    let report = ErrorReport::from(&err);

    assert_eq!(report.kind, ErrorKind::ConfigNotFound);
    assert_eq!(report.path, Some(PathBuf::from("/srv/app/config")));
    assert_eq!(report.message, err.to_string());

    let report = ErrorReport::from(&TrellisError::OptionError("unknown option 'x'".to_string()));
    assert_eq!(report.kind, ErrorKind::Option);
    assert_eq!(report.path, None);
}
