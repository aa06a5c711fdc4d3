//! Application error type.
//!
//! Every failure in a run is fatal, so a single error type carrying a process
//! exit code and a human-readable message is all the binary needs.

/// Exit code for I/O failures and input schema problems.
pub const EXIT_IO: u8 = 2;
/// Exit code for data that cannot be resampled (empty, duplicate, non-finite, out of range).
pub const EXIT_DATA: u8 = 3;
/// Exit code for numerical failures while fitting the smoothing spline.
pub const EXIT_NUMERIC: u8 = 4;
/// Exit code for report assembly failures (missing placeholder or fragment).
pub const EXIT_REPORT: u8 = 5;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
