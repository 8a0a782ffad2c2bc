//! Exit codes for the `ocicert` binary.
//! Auth failures map through `AuthError::exit_code`, so the two stay in step.

use ocicert_auth::AuthError;

pub const SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 1; // Bad flags, reference or URL
pub const AUTH_ERROR: i32 = 2; // Token exchange or cached token refused
pub const PROTOCOL_ERROR: i32 = 3; // Registry or token server misbehaved
pub const TRANSPORT_ERROR: i32 = 5; // Network/TLS failure

/// Exit code for an error returned by a command.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<AuthError>())
        .map(AuthError::exit_code)
        .unwrap_or(CONFIG_ERROR)
}
