//! Diagram-request gateway for a PlantUML rendering engine.
//!
//! This crate turns diagram source text into rendered images by talking to
//! an external rendering engine over HTTP. The engine has one awkward
//! property this crate exists to absorb: it always answers with an image,
//! even for a malformed diagram, signalling syntax errors *in-band* as a
//! textual annotation inside a nominally successful response. A caller that
//! only checks the HTTP status would treat a broken diagram as rendered.
//!
//! # Architecture
//!
//! - [`format`]: output format selection (`RenderFormat`)
//! - [`transport`]: single-request HTTP client behind the [`Transport`] seam
//! - [`classify`]: in-band error detection over raw engine responses
//! - [`prepare`]: `@startuml`/`@enduml` wrapping and PNG DPI injection
//! - [`gateway`]: the [`Gateway`] facade exposing `render` and `validate`
//!
//! Every render/validate call is independent and stateless; the gateway
//! holds no mutable state and tolerates arbitrary concurrency. Malformed
//! diagrams, oversized sources, and transport faults are all returned as
//! values, never panics.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use plantgate_gateway::{Gateway, GatewayOptions, RenderFormat, RenderOutcome};
//!
//! let gateway = Gateway::new("http://127.0.0.1:8000/plantuml", GatewayOptions::default());
//! match gateway.render("Alice -> Bob: hi", RenderFormat::Svg, Duration::from_secs(5)) {
//!     RenderOutcome::Success { bytes, .. } => println!("{} bytes of SVG", bytes.len()),
//!     RenderOutcome::SyntaxError(detail) => eprintln!("bad diagram: {}", detail.message),
//!     RenderOutcome::TransportError(e) => eprintln!("engine unavailable: {e}"),
//! }
//! ```

mod classify;
mod consts;
mod format;
mod gateway;
mod outcome;
mod prepare;
mod transport;

pub use classify::classify;
pub use consts::{
    DEFAULT_MAX_SOURCE_BYTES, DEFAULT_PNG_DPI, DEFAULT_TIMEOUT, DEFAULT_VALIDATE_TIMEOUT,
};
pub use format::RenderFormat;
pub use gateway::{Gateway, GatewayOptions};
pub use outcome::{RenderOutcome, SyntaxDetail, ValidationResult};
pub use prepare::prepare_source;
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
