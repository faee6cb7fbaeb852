// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `testdeck` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum TestdeckExitCode {}

impl TestdeckExitCode {
    /// No errors occurred and every test and module that finished passed.
    pub const OK: i32 = 0;

    /// At least one test or module failed.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// An error occurred during setup: invalid configuration, or an unreadable input.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing the dashboard to the terminal failed.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;

    /// The tracker lost track of a test it had accepted. This is a bug in testdeck.
    pub const INTERNAL_ERROR: i32 = 101;
}
