//! Exit codes for the CLI
//!
//! | Code | Constant | Meaning |
//! |------|----------|---------|
//! | 0 | `SUCCESS` | Command completed; for `match`, a rule or fallback applied |
//! | 1 | `NO_MATCH` | `match` found no rule and no fallback destination is set |
//! | 2 | `INVALID_RULES` | `check` discarded definitions or could not use the source |
//! | 3 | `ERROR` | Runtime error (bad configuration, unwritable output) |

/// Success.
pub const SUCCESS: i32 = 0;

/// No rule matched the event and no default destination is configured.
pub const NO_MATCH: i32 = 1;

/// The rules source was unusable or some definitions were discarded.
pub const INVALID_RULES: i32 = 2;

/// Runtime error.
pub const ERROR: i32 = 3;
