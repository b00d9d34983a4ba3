//! Exit codes of the `softnunit` binary.
//! These codes are part of the public contract; failing tests alone never
//! produce a non-zero code.

pub const SUCCESS: i32 = 0;
pub const COMMAND_FAILED: i32 = 1; // Console returned a negative code, was killed, or could not start
pub const INTERNAL_ERROR: i32 = 2; // Bad input, settings, or report file
