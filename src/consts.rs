pub mod cli_consts {
    //! Client Configuration Constants
    //!
    //! This module contains all configuration constants for the mailbox client,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // STORAGE CONFIGURATION
    // =============================================================================
    // Key names are shared with the hosted web frontend so state written by one
    // client can be read by the other.

    /// Storage key of the saved-mailbox list.
    pub const SAVED_MAILBOXES_KEY: &str = "savedMailboxes";

    /// Storage key of the mailbox that was active when the client last ran.
    pub const CURRENT_MAILBOX_KEY: &str = "currentMailbox";

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// Maximum number of event buffer size for worker threads
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Inbox polling configuration
    pub mod inbox_polling {
        use std::time::Duration;

        /// Interval between inbox fetches for the active mailbox (milliseconds)
        pub const POLL_INTERVAL_MS: u64 = 5_000;

        /// Initial delay before retrying a failed fetch (milliseconds)
        pub const INITIAL_BACKOFF_MS: u64 = 2_000;

        /// Ceiling for the fetch retry delay (milliseconds)
        pub const MAX_BACKOFF_MS: u64 = 60_000;

        /// Helper function to get the polling interval
        pub const fn poll_interval() -> Duration {
            Duration::from_millis(POLL_INTERVAL_MS)
        }

        /// Helper function to get the initial backoff duration
        pub const fn initial_backoff() -> Duration {
            Duration::from_millis(INITIAL_BACKOFF_MS)
        }

        /// Helper function to get the backoff ceiling
        pub const fn max_backoff() -> Duration {
            Duration::from_millis(MAX_BACKOFF_MS)
        }
    }

    /// HTTP client configuration
    pub mod http {
        use std::time::Duration;

        /// Connection timeout for API requests (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Overall timeout for API requests (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 30;

        /// Helper function to get the connection timeout
        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        /// Helper function to get the request timeout
        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }
}
