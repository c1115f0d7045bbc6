//! Facade tests against fixture transports.
//!
//! The [`Transport`] trait is the injection seam: these tests script engine
//! responses and record every call, so the facade's composition (prepare →
//! size guard → encode → fetch → classify) is checked without a live
//! engine. A real-engine smoke test exists at the bottom but is ignored by
//! default.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;

use plantgate_encoding::decode;
use plantgate_gateway::{
    Gateway, GatewayOptions, RawResponse, RenderFormat, RenderOutcome, Transport, TransportError,
};

const ERROR_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg">"#,
    r#"<text x="10" y="20">@startuml</text>"#,
    r#"<text x="10" y="40">Alice-Bob</text>"#,
    r#"<text x="10" y="60">[From string (line 3) ]</text>"#,
    r#"<text x="10" y="80">Syntax error</text>"#,
    "</svg>",
);

const CLEAN_SVG: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg"><text x="10" y="20">Alice</text></svg>"#;

/// What the fixture transport should do on each call.
enum Script {
    Respond(RawResponse),
    TimeOut,
}

/// Scripted transport recording every call it receives.
struct FixtureTransport {
    script: Script,
    calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

impl FixtureTransport {
    fn respond(status: u16, content_type: &str, body: &[u8]) -> Self {
        Self {
            script: Script::Respond(RawResponse {
                status,
                content_type: content_type.to_owned(),
                body: body.to_vec(),
            }),
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    fn time_out() -> Self {
        Self {
            script: Script::TimeOut,
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

impl Transport for &FixtureTransport {
    fn fetch(
        &self,
        token: &str,
        _format: RenderFormat,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(token.to_owned());
        match &self.script {
            Script::Respond(response) => Ok(response.clone()),
            Script::TimeOut => Err(TransportError::Timeout(timeout)),
        }
    }
}

fn gateway(transport: &FixtureTransport) -> Gateway<&FixtureTransport> {
    Gateway::with_transport(transport, GatewayOptions::default())
}

#[test]
fn test_render_success_passes_bytes_through() {
    let transport = FixtureTransport::respond(200, "image/svg+xml", CLEAN_SVG.as_bytes());
    let outcome = gateway(&transport).render(
        "@startuml\nAlice -> Bob: hi\n@enduml",
        RenderFormat::Svg,
        Duration::from_secs(5),
    );

    match outcome {
        RenderOutcome::Success { bytes, media_type } => {
            assert_eq!(bytes, CLEAN_SVG.as_bytes());
            assert_eq!(media_type, "image/svg+xml");
        }
        other => panic!("expected Success, got {other:?}"),
    }
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_render_sends_decodable_token() {
    let transport = FixtureTransport::respond(200, "image/svg+xml", CLEAN_SVG.as_bytes());
    gateway(&transport).render("Alice -> Bob: hi", RenderFormat::Svg, Duration::from_secs(5));

    // The transport receives the encoded form of the prepared source.
    let token = transport.last_token().expect("transport was called");
    assert_eq!(decode(&token).unwrap(), "@startuml\nAlice -> Bob: hi\n@enduml");
}

#[test]
fn test_render_png_injects_dpi_into_token() {
    let transport = FixtureTransport::respond(200, "image/png", &[0x89, b'P', b'N', b'G']);
    let options = GatewayOptions {
        png_dpi: 300,
        ..GatewayOptions::default()
    };
    Gateway::with_transport(&transport, options).render(
        "Alice -> Bob",
        RenderFormat::Png,
        Duration::from_secs(5),
    );

    let token = transport.last_token().expect("transport was called");
    assert_eq!(
        decode(&token).unwrap(),
        "@startuml\nskinparam dpi 300\nAlice -> Bob\n@enduml"
    );
}

#[test]
fn test_render_maps_engine_error_annotation() {
    let transport = FixtureTransport::respond(200, "image/svg+xml", ERROR_SVG.as_bytes());
    let outcome = gateway(&transport).render(
        "@startuml\nAlice-Bob\n@enduml",
        RenderFormat::Svg,
        Duration::from_secs(5),
    );

    match outcome {
        RenderOutcome::SyntaxError(detail) => {
            assert_eq!(detail.line, Some(3));
            assert_eq!(detail.message, "Syntax error");
        }
        other => panic!("expected SyntaxError, got {other:?}"),
    }
}

#[test]
fn test_size_guard_short_circuits_without_transport_call() {
    let transport = FixtureTransport::respond(200, "image/svg+xml", CLEAN_SVG.as_bytes());
    let options = GatewayOptions {
        max_source_bytes: 64,
        ..GatewayOptions::default()
    };
    let big_source = format!("@startuml\n{}\n@enduml", "A -> B: x\n".repeat(100));

    let outcome = Gateway::with_transport(&transport, options).render(
        &big_source,
        RenderFormat::Svg,
        Duration::from_secs(5),
    );

    match outcome {
        RenderOutcome::SyntaxError(detail) => {
            assert_eq!(detail.line, None);
            assert!(detail.message.contains("exceeding"));
        }
        other => panic!("expected SyntaxError, got {other:?}"),
    }
    assert_eq!(transport.call_count(), 0, "oversized source must never be sent");
}

#[test]
fn test_render_surfaces_timeout() {
    let transport = FixtureTransport::time_out();
    let outcome = gateway(&transport).render(
        "@startuml\nA -> B\n@enduml",
        RenderFormat::Svg,
        Duration::from_millis(250),
    );

    match outcome {
        RenderOutcome::TransportError(e) => assert_eq!(e.cause(), "timeout"),
        other => panic!("expected TransportError, got {other:?}"),
    }
}

#[test]
fn test_render_empty_body_is_empty_response() {
    let transport = FixtureTransport::respond(200, "image/svg+xml", b"");
    let outcome = gateway(&transport).render(
        "@startuml\nA -> B\n@enduml",
        RenderFormat::Svg,
        Duration::from_secs(5),
    );

    match outcome {
        RenderOutcome::TransportError(e) => assert_eq!(e.cause(), "empty-response"),
        other => panic!("expected TransportError, got {other:?}"),
    }
}

#[test]
fn test_validate_accepts_clean_render() {
    let transport = FixtureTransport::respond(200, "image/svg+xml", CLEAN_SVG.as_bytes());
    let result = gateway(&transport)
        .validate("@startuml\nAlice -> Bob: hi\n@enduml")
        .unwrap();

    assert!(result.valid);
    assert_eq!(result.error, None);
}

#[test]
fn test_validate_reports_syntax_detail() {
    let transport = FixtureTransport::respond(200, "image/svg+xml", ERROR_SVG.as_bytes());
    let result = gateway(&transport)
        .validate("@startuml\nAlice-Bob\n@enduml")
        .unwrap();

    assert!(!result.valid);
    let detail = result.error.expect("invalid result carries detail");
    assert_eq!(detail.line, Some(3));
    assert_eq!(detail.message, "Syntax error");
}

#[test]
fn test_validate_does_not_fold_transport_failure_into_invalid() {
    let transport = FixtureTransport::time_out();
    let err = gateway(&transport)
        .validate("@startuml\nA -> B\n@enduml")
        .unwrap_err();

    assert_eq!(err.cause(), "timeout");
}

/// Smoke test against a real engine. Needs a PlantUML server at the URL
/// below; run with `cargo test -- --ignored`.
#[test]
#[ignore = "requires a running rendering engine"]
fn test_live_engine_round_trip() {
    let gateway = Gateway::new("http://127.0.0.1:8000/plantuml", GatewayOptions::default());

    let outcome = gateway.render(
        "@startuml\nAlice->Bob: hi\n@enduml",
        RenderFormat::Svg,
        Duration::from_secs(5),
    );
    match outcome {
        RenderOutcome::Success { bytes, .. } => {
            assert!(!bytes.is_empty());
            let text = String::from_utf8_lossy(&bytes);
            assert!(!text.contains("Syntax Error"));
        }
        other => panic!("expected Success from live engine, got {other:?}"),
    }

    let outcome = gateway.render(
        "@startuml\nAlice-Bob\n@enduml",
        RenderFormat::Svg,
        Duration::from_secs(5),
    );
    match outcome {
        RenderOutcome::SyntaxError(detail) => assert!(!detail.message.is_empty()),
        other => panic!("expected SyntaxError from live engine, got {other:?}"),
    }
}
