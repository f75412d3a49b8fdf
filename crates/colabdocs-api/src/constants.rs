//! API constants

/// Versioned prefix for every API route.
pub const API_PREFIX: &str = "/api/v0";

/// Extra room for multipart framing on top of the archive size limit.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Imports allocate identifiers from the greatest stored one, so one
/// instance runs them one at a time.
pub const MAX_CONCURRENT_IMPORTS: usize = 1;
