//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (also when titles are missing)   |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, bad config)   |
//! | 3-9     | compare          | Input / output failures                  |
//! | 130     | compare          | Cancelled by Ctrl-C, partial result      |

use streamgap_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid config file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Compare (3-9)
// =============================================================================

/// Input file unreadable or not valid CSV.
pub const EXIT_LOAD: u8 = 3;

/// Input file lacks a required title column.
pub const EXIT_SCHEMA: u8 = 4;

/// Result file could not be written. Any previous file is left untouched.
pub const EXIT_EXPORT: u8 = 5;

/// HTTP client could not be set up.
pub const EXIT_CLIENT: u8 = 6;

/// Verification was interrupted. The partial result was still reported.
pub const EXIT_CANCELLED: u8 = 130;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_USAGE,
        ReconError::Load { .. } => EXIT_LOAD,
        ReconError::Schema { .. } => EXIT_SCHEMA,
        ReconError::Export(_) => EXIT_EXPORT,
        ReconError::Network { .. } => EXIT_ERROR,
    }
}
