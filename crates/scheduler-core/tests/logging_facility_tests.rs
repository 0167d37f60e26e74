#![allow(clippy::unwrap_used, clippy::expect_used)]

use scheduler_core::errors::{ExError, ExErrorKind, SchedulerError};
use scheduler_core::logging_facility::test_capture::init_test_capture;
use scheduler_core::{log_op_end, log_op_error, log_op_start};
use scheduler_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_ERR_MESSAGE, FIELD_EVENT, FIELD_OP,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, classroom_count = 3);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field("classroom_count"), Some("3"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    capture.assert_event_exists(op_name, EVENT_END);
    let events = capture.events_for_op(op_name);
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = SchedulerError::ClassroomNotFound { classroom_id: 12 };
    log_op_error!(op_name, err, duration_ms = 10);

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR)
    });
    assert_eq!(errors, 1);
    let event = &capture.events_for_op(op_name)[0];
    assert_eq!(event.field("err_code"), Some("ERR_NOT_FOUND"));
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::Persistence).with_message("disk full");
    log_op_error!(op_name, err, duration_ms = 1, table = "blocks");

    let event = &capture.events_for_op(op_name)[0];
    assert_eq!(event.field("err_code"), Some("ERR_PERSISTENCE"));
    assert_eq!(event.field("err_message"), Some("disk full"));
    assert_eq!(event.field("table"), Some("blocks"));
}

#[test]
fn test_macros_emit_schema_field_names() {
    let capture = init_test_capture();
    let op_name = "test_schema_field_names_unique_5";

    log_op_end!(op_name, duration_ms = 3);
    let err = ExError::new(ExErrorKind::Io).with_message("pipe closed");
    log_op_error!(op_name, err, duration_ms = 4);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 2);
    for event in &events {
        assert!(event.field(FIELD_COMPONENT).is_some());
        assert_eq!(event.field(FIELD_OP), Some(op_name));
        assert!(event.field(FIELD_EVENT).is_some());
        assert!(event.field(FIELD_DURATION_MS).is_some());
    }

    let error = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .unwrap();
    assert_eq!(error.field(FIELD_ERR_KIND), Some("Io"));
    assert_eq!(error.field(FIELD_ERR_CODE), Some("ERR_IO"));
    assert_eq!(error.field(FIELD_ERR_MESSAGE), Some("pipe closed"));
}

#[test]
fn test_domain_errors_map_to_kinds() {
    let not_found: ExError = SchedulerError::ClassroomNotFound { classroom_id: 5 }.into();
    assert_eq!(not_found.kind(), ExErrorKind::NotFound);
    assert_eq!(not_found.entity_id(), Some("5"));

    let unknown: ExError = SchedulerError::UnknownSetting {
        key: "lunch".to_string(),
    }
    .into();
    assert_eq!(unknown.code(), "ERR_INVALID_INPUT");
    assert_eq!(unknown.op(), Some("update_setting"));
}
