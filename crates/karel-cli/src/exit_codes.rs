//! Process exit codes for `karel run` and `karel check`.

pub const SUCCESS: i32 = 0;
/// Bad input: unreadable files, compile errors, invalid worlds.
pub const FAILURE: i32 = 1;
/// The program ran and hit a runtime fault.
pub const FAULTED: i32 = 2;
/// `--max-steps` was reached before the program finished.
pub const STEP_LIMIT: i32 = 3;
