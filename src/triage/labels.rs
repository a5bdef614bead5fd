pub const ENHANCEMENT: &str = "enhancement";
pub const REQUIRES_CONFIGURATION: &str = "requires-configuration";
pub const DOCUMENTATION: &str = "documentation";
pub const BUG: &str = "bug";
pub const MISSING_LOG: &str = "missing-log";
pub const MISSING_VERSION: &str = "missing-version";
pub const UNSUPPORTED_VERSION: &str = "unsupported-version";

/// Labels that mean the bot is waiting on the reporter.
pub const PENDING: [&str; 3] = [MISSING_VERSION, UNSUPPORTED_VERSION, MISSING_LOG];
