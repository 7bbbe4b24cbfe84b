//! # Logging Macros
//!
//! Convenience macros for structured logging with consistent field names.

/// Log an API request with method, path, status, and duration.
#[macro_export]
macro_rules! log_api_request {
    ($request_id:expr, $method:expr, $path:expr, $status:expr, $duration:expr) => {
        tracing::info!(
            target: "api",
            request_id = %$request_id,
            method = %$method,
            path = %$path,
            status = %$status,
            duration_ms = %$duration,
            "API request"
        )
    };
}

/// Log a team lifecycle event.
///
/// # Example
///
/// ```rust
/// let team_id = "b5c1";
/// let user_id = "u1";
/// logging::log_team_event!("team_locked", team_id, user_id);
/// logging::log_team_event!("member_kicked", team_id, user_id, member_id = %"m2");
/// ```
#[macro_export]
macro_rules! log_team_event {
    ($event:expr, $team_id:expr, $user_id:expr) => {
        tracing::info!(
            target: "teams",
            event = %$event,
            team_id = %$team_id,
            user_id = %$user_id,
            "Team event"
        )
    };
    ($event:expr, $team_id:expr, $user_id:expr, $($fields:tt)+) => {
        tracing::info!(
            target: "teams",
            event = %$event,
            team_id = %$team_id,
            user_id = %$user_id,
            $($fields)+,
            "Team event"
        )
    };
}

/// Log a call to an external service with its outcome.
#[macro_export]
macro_rules! log_external_call {
    ($service:expr, $operation:expr, $success:expr, $duration:expr) => {
        tracing::info!(
            target: "external",
            service = %$service,
            operation = %$operation,
            success = $success,
            duration_ms = %$duration,
            "External call"
        )
    };
}
