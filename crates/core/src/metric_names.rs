//! Well-known performance-data labels.
//!
//! Monitoring dashboards graph these by name, so they are part of the
//! output contract.

/// Original (uncompressed) size of the newest archive, in bytes.
pub const METRIC_ORIGINAL_SIZE: &str = "osize";

/// Compressed size of the newest archive, in bytes.
pub const METRIC_COMPRESSED_SIZE: &str = "csize";

/// Deduplicated size of the newest archive, in bytes.
pub const METRIC_DEDUPLICATED_SIZE: &str = "dsize";

/// Original size of the whole repository, in bytes.
pub const METRIC_GLOBAL_ORIGINAL_SIZE: &str = "gosize";

/// Compressed size of the whole repository, in bytes.
pub const METRIC_GLOBAL_COMPRESSED_SIZE: &str = "gcsize";

/// Deduplicated size of the whole repository, in bytes.
pub const METRIC_GLOBAL_DEDUPLICATED_SIZE: &str = "gdsize";

/// Size of a backup, an export or a directory tree, in bytes.
pub const METRIC_SIZE: &str = "size";

/// Number of exported wiki pages.
pub const METRIC_PAGES: &str = "pages";

/// Chassis temperature reading in degrees Celsius.
pub const METRIC_CHASSIS_TEMPERATURE: &str = "chassis";

/// Chassis power draw in watts.
pub const METRIC_POWER: &str = "power";
