//! Canonical logging macros
//!
//! Field names come from `scheduler_core_types::schema`, passed to `tracing`
//! as constant field names (`{ CONST } = value`).

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use scheduler_core::log_op_start;
/// log_op_start!("replace_all");
/// log_op_start!("replace_all", classroom_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            { $crate::scheduler_core_types::schema::FIELD_COMPONENT } = module_path!(),
            { $crate::scheduler_core_types::schema::FIELD_OP } = $op,
            { $crate::scheduler_core_types::schema::FIELD_EVENT } =
                $crate::scheduler_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            { $crate::scheduler_core_types::schema::FIELD_COMPONENT } = module_path!(),
            { $crate::scheduler_core_types::schema::FIELD_OP } = $op,
            { $crate::scheduler_core_types::schema::FIELD_EVENT } =
                $crate::scheduler_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use scheduler_core::log_op_end;
/// log_op_end!("replace_all", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            { $crate::scheduler_core_types::schema::FIELD_COMPONENT } = module_path!(),
            { $crate::scheduler_core_types::schema::FIELD_OP } = $op,
            { $crate::scheduler_core_types::schema::FIELD_EVENT } =
                $crate::scheduler_core_types::schema::EVENT_END,
            { $crate::scheduler_core_types::schema::FIELD_DURATION_MS } = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            { $crate::scheduler_core_types::schema::FIELD_COMPONENT } = module_path!(),
            { $crate::scheduler_core_types::schema::FIELD_OP } = $op,
            { $crate::scheduler_core_types::schema::FIELD_EVENT } =
                $crate::scheduler_core_types::schema::EVENT_END,
            { $crate::scheduler_core_types::schema::FIELD_DURATION_MS } = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into `ExError`.
///
/// # Example
///
/// ```
/// # use scheduler_core::log_op_error;
/// # use scheduler_core::errors::SchedulerError;
/// let err = SchedulerError::ClassroomNotFound { classroom_id: 7 };
/// log_op_error!("classroom_view", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            { $crate::scheduler_core_types::schema::FIELD_COMPONENT } = module_path!(),
            { $crate::scheduler_core_types::schema::FIELD_OP } = $op,
            { $crate::scheduler_core_types::schema::FIELD_EVENT } =
                $crate::scheduler_core_types::schema::EVENT_END_ERROR,
            { $crate::scheduler_core_types::schema::FIELD_DURATION_MS } = $duration,
            { $crate::scheduler_core_types::schema::FIELD_ERR_KIND } = ?ex_err.kind(),
            { $crate::scheduler_core_types::schema::FIELD_ERR_CODE } = ex_err.code(),
            { $crate::scheduler_core_types::schema::FIELD_ERR_MESSAGE } = ex_err.message(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            { $crate::scheduler_core_types::schema::FIELD_COMPONENT } = module_path!(),
            { $crate::scheduler_core_types::schema::FIELD_OP } = $op,
            { $crate::scheduler_core_types::schema::FIELD_EVENT } =
                $crate::scheduler_core_types::schema::EVENT_END_ERROR,
            { $crate::scheduler_core_types::schema::FIELD_DURATION_MS } = $duration,
            { $crate::scheduler_core_types::schema::FIELD_ERR_KIND } = ?ex_err.kind(),
            { $crate::scheduler_core_types::schema::FIELD_ERR_CODE } = ex_err.code(),
            { $crate::scheduler_core_types::schema::FIELD_ERR_MESSAGE } = ex_err.message(),
            $($field)*
        );
    }};
}
