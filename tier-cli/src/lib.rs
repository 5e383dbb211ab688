//! Tier CLI - Command Line Interface
//!
//! Sweeps a local blob container through its access tiers.
//!
//! # Usage
//!
//! ```text
//! tiers [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show     List every object and its current tier
//!   rotate   Move every object to its next tier
//!   cycle    Show, rotate, then show again
//!
//! Options:
//!       --connection-string <CONN>  Storage root [env: STORAGE_CONNECTION_STRING]
//!   -c, --container <NAME>          Container to sweep [env: CONTAINER_NAME]
//!       --page-size <N>             Objects per listing page [default: 5000]
//!       --prefix <PREFIX>           Only sweep matching objects
//!       --concurrency <N>           Tier changes issued at once [default: 1]
//!   -f, --format <FORMAT>           Output format (json, table, plain) [default: table]
//!       --metrics                   Print sweep counters when done
//!   -v, --verbose                   Enable verbose output
//! ```
//!
//! # Examples
//!
//! ```text
//! tiers --connection-string /srv/blobs --container media show
//! tiers -c media --concurrency 8 rotate
//! tiers -c media cycle --pause
//! ```

pub mod commands;
pub mod error;
pub mod handler;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use error::{CliError, CliResult};

/// Tier CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
