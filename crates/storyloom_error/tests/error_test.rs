use storyloom_error::{
    ConfigError, GatewayError, GatewayErrorKind, JobError, JobErrorKind, StorageError,
    StorageErrorKind, StoryloomError, StoryloomErrorKind,
};

#[test]
fn transport_failures_surface_as_gateway_errors() {
    let err: StoryloomError =
        GatewayError::new(GatewayErrorKind::Transport("Connection refused".to_string())).into();

    assert!(matches!(err.kind(), StoryloomErrorKind::Gateway(_)));
    assert_eq!(err.user_message(), "Connection refused");
    assert!(err.to_string().starts_with("Storyloom Error: Gateway Error: Connection refused"));
}

#[test]
fn user_message_drops_wrapper_and_location() {
    let job: StoryloomError = JobError::new(JobErrorKind::EmptyPrompt).into();
    let storage: StoryloomError = StorageError::new(StorageErrorKind::NothingToExport).into();
    let config: StoryloomError = ConfigError::new("Failed to parse configuration").into();

    assert_eq!(job.user_message(), "Prompt cannot be empty");
    assert_eq!(storage.user_message(), "No generated results to export");
    assert_eq!(config.user_message(), "Failed to parse configuration");
    assert!(job.to_string().contains("error_test.rs"));
}
