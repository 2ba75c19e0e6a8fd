//! Oracle fallback behaviour, exercised with in-process mock oracles.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use wiresmith::prelude::*;
use wiresmith::{DiagramOracle, DiagramSource, OllamaOracle, OracleError};

fn led_parts() -> Vec<Part> {
    vec![
        Part::new("wokwi-arduino-uno", "mcu").at(200.0, 200.0),
        Part::new("wokwi-led", "led1").at(80.0, 350.0),
    ]
}

enum Reply {
    Nothing,
    DropParts(usize),
    Fail,
    Recolor(&'static str),
}

struct MockOracle {
    reply: Reply,
    calls: AtomicUsize,
}

impl MockOracle {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiagramOracle for MockOracle {
    fn name(&self) -> &str {
        "mock"
    }

    async fn enhance(
        &self,
        initial: &Diagram,
        _parts: &[Part],
    ) -> Result<Option<Diagram>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Nothing => Ok(None),
            Reply::DropParts(n) => {
                let mut d = initial.clone();
                d.parts.truncate(d.parts.len().saturating_sub(*n));
                Ok(Some(d))
            }
            Reply::Fail => Err(OracleError::Unavailable("model not loaded".into())),
            Reply::Recolor(color) => {
                let mut d = initial.clone();
                for c in d.connections.iter_mut() {
                    c.color = color.to_string();
                }
                Ok(Some(d))
            }
        }
    }
}

#[tokio::test]
async fn test_without_oracle_matches_deterministic() {
    let parts = led_parts();
    let options = SynthesisOptions::default();
    let plain = WiresmithCore::synthesize(&parts, &options);
    let consulted = WiresmithCore::synthesize_with_oracle(&parts, &options, None).await;
    assert_eq!(plain.document, consulted.document);
    assert_eq!(consulted.source, DiagramSource::Deterministic);
}

#[tokio::test]
async fn test_oracle_none_keeps_deterministic() {
    let parts = led_parts();
    let options = SynthesisOptions::default();
    let oracle = MockOracle::new(Reply::Nothing);

    let out = WiresmithCore::synthesize_with_oracle(&parts, &options, Some(&oracle)).await;
    assert_eq!(oracle.calls(), 1);
    assert_eq!(out.source, DiagramSource::Deterministic);
    assert_eq!(out.document, WiresmithCore::synthesize(&parts, &options).document);
}

#[tokio::test]
async fn test_part_count_mismatch_rejected() {
    let parts = led_parts();
    let options = SynthesisOptions::default();
    let oracle = MockOracle::new(Reply::DropParts(1));

    let out = WiresmithCore::synthesize_with_oracle(&parts, &options, Some(&oracle)).await;
    assert_eq!(out.source, DiagramSource::Deterministic);
    assert_eq!(out.diagram().unwrap().parts.len(), 3);
}

#[tokio::test]
async fn test_oracle_error_falls_back() {
    let parts = led_parts();
    let oracle = MockOracle::new(Reply::Fail);

    let out =
        WiresmithCore::synthesize_with_oracle(&parts, &SynthesisOptions::default(), Some(&oracle))
            .await;
    assert!(!out.is_error());
    assert_eq!(out.source, DiagramSource::Deterministic);
}

#[tokio::test]
async fn test_oracle_result_accepted() {
    let parts = led_parts();
    let oracle = MockOracle::new(Reply::Recolor("white"));

    let out =
        WiresmithCore::synthesize_with_oracle(&parts, &SynthesisOptions::default(), Some(&oracle))
            .await;
    assert_eq!(out.source, DiagramSource::Oracle("mock".to_string()));

    let diagram = out.diagram().unwrap();
    assert!(diagram.connections.iter().all(|c| c.color == "white"));
    // The safety marker survives the swap, so a later pass leaves the LED alone.
    assert!(diagram.part("led1").unwrap().protected);
    assert_eq!(out.inserted_resistors, vec!["R1"]);
}

#[tokio::test]
async fn test_oracle_skipped_without_mcu() {
    let parts = vec![Part::new("wokwi-led", "led1")];
    let oracle = MockOracle::new(Reply::Recolor("white"));

    let out =
        WiresmithCore::synthesize_with_oracle(&parts, &SynthesisOptions::default(), Some(&oracle))
            .await;
    assert!(out.is_error());
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_unreachable_ollama_falls_back() {
    // Nothing listens on port 9 locally; the request fails fast.
    let oracle = OllamaOracle::with_timeout(Some("http://127.0.0.1:9".to_string()), None, 2);
    let parts = led_parts();

    let out =
        WiresmithCore::synthesize_with_oracle(&parts, &SynthesisOptions::default(), Some(&oracle))
            .await;
    assert_eq!(out.source, DiagramSource::Deterministic);
    assert_eq!(out.diagram().unwrap().parts.len(), 3);
}
