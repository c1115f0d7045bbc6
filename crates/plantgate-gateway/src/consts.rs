//! Internal constants for the gateway.

use std::time::Duration;

/// Default HTTP timeout for render requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for validation renders, which discard the image and only
/// need the engine's verdict (10 seconds).
pub const DEFAULT_VALIDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default DPI injected into PNG renders for high-resolution output.
pub const DEFAULT_PNG_DPI: u32 = 300;

/// Default ceiling on prepared source size. The engine enforces its own
/// limit; oversized requests are rejected locally instead of being sent.
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 100_000;
