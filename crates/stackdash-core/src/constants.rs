//! Shared constants.

/// Maximum length of an encoded resource id (`task-` plus seven hex digits).
pub const ID_ENCODED_MAX_LEN: u16 = 12;

/// Number of log messages retained before the oldest is evicted.
pub const LOG_MESSAGE_CAP: usize = 500;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 2;
    /// The terminal could not be set up or restored.
    pub const ERROR_TERMINAL: i32 = 3;
    /// Interrupted by a signal (Ctrl+C / SIGTERM).
    pub const ERROR_INTERRUPTED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_width_fits_longest_prefix() {
        // "task-" + 7 hex digits
        assert_eq!(usize::from(ID_ENCODED_MAX_LEN), "task-".len() + 7);
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            exit_codes::SUCCESS,
            exit_codes::ERROR_GENERIC,
            exit_codes::ERROR_CONFIG,
            exit_codes::ERROR_TERMINAL,
            exit_codes::ERROR_INTERRUPTED,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
