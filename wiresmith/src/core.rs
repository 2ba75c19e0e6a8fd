//! Synthesis entry point shared by the CLI and library callers.
//! No I/O happens until a finished document is written out.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::diagram::{Diagram, Document, Netlist, Part, DEFAULT_AUTHOR, DEFAULT_EDITOR};
use crate::mcu::{find_mcu, PinWarning};
use crate::oracle::ollama::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_TIMEOUT_SECS};
use crate::oracle::{DiagramOracle, OracleError};
use crate::routing::WireRouter;
use crate::safety::insert_safety_resistors;
use crate::wiring::wire_part;

#[derive(Debug, thiserror::Error)]
pub enum WiresmithError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid part at index {index}: {reason}")]
    InvalidPart { index: usize, reason: String },
}

/// Where to reach the optional oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: None,
            model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OracleConfig {
    pub fn url_or_default(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL)
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Options for a synthesis run (CLI, config file or library caller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    pub author: String,
    pub editor: String,
    pub insert_safety_resistors: bool,
    /// Attach pin-exhaustion warnings to the emitted diagram.
    pub report_pin_exhaustion: bool,
    pub enable_oracle: bool,
    pub oracle: OracleConfig,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            editor: DEFAULT_EDITOR.to_string(),
            insert_safety_resistors: true,
            report_pin_exhaustion: false,
            enable_oracle: false,
            oracle: OracleConfig::default(),
        }
    }
}

impl SynthesisOptions {
    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, WiresmithError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Parse and validate caller-supplied parts.
///
/// Accepts either a bare array or an object with a `parts` array (so an
/// existing `diagram.json` can be fed back in).
pub fn parse_parts(json: &str) -> Result<Vec<Part>, WiresmithError> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("parts") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(WiresmithError::Parse("\"parts\" must be an array".into())),
            None => return Err(WiresmithError::Parse("expected an array of parts".into())),
        },
        _ => return Err(WiresmithError::Parse("expected an array of parts".into())),
    };

    let mut seen = HashSet::new();
    let mut parts = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let invalid = |reason: &str| WiresmithError::InvalidPart {
            index,
            reason: reason.to_string(),
        };
        let Some(obj) = item.as_object() else {
            return Err(invalid("not an object"));
        };
        for field in ["id", "type"] {
            match obj.get(field).and_then(Value::as_str) {
                Some(s) if !s.trim().is_empty() => {}
                _ => return Err(invalid(&format!("missing or empty \"{}\"", field))),
            }
        }

        let part: Part = serde_json::from_value(item).map_err(|e| invalid(&e.to_string()))?;
        if !seen.insert(part.id.clone()) {
            return Err(invalid(&format!("duplicate id \"{}\"", part.id)));
        }
        parts.push(part);
    }
    Ok(parts)
}

pub fn load_parts(path: &Path) -> Result<Vec<Part>, WiresmithError> {
    let content = std::fs::read_to_string(path)?;
    parse_parts(&content)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramSource {
    Deterministic,
    /// Accepted from the named oracle.
    Oracle(String),
}

/// Output of one synthesis call.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub document: Document,
    /// Pin-exhaustion warnings, recorded whether or not they are reported
    /// in the document.
    pub warnings: Vec<PinWarning>,
    pub inserted_resistors: Vec<String>,
    pub source: DiagramSource,
}

impl Synthesis {
    fn failed(document: Document) -> Self {
        Self {
            document,
            warnings: Vec::new(),
            inserted_resistors: Vec::new(),
            source: DiagramSource::Deterministic,
        }
    }

    pub fn diagram(&self) -> Option<&Diagram> {
        self.document.diagram()
    }

    pub fn is_error(&self) -> bool {
        self.document.is_error()
    }

    pub fn to_json(&self) -> Result<String, WiresmithError> {
        Ok(self.document.to_json_pretty()?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), WiresmithError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Core synthesis API used by both library callers and the CLI.
pub struct WiresmithCore;

impl WiresmithCore {
    /// Wire `parts` into a complete diagram.
    ///
    /// Never fails: a missing microcontroller is reported as an error
    /// document, unknown parts get default wiring and exhausted pools fall
    /// back to a repeated pin.
    pub fn synthesize(parts: &[Part], options: &SynthesisOptions) -> Synthesis {
        let Some((mcu, family)) = find_mcu(parts) else {
            tracing::warn!("No microcontroller among {} parts", parts.len());
            return Synthesis::failed(Document::no_mcu());
        };

        let mut alloc = family.allocator();
        let router = WireRouter::new();
        let mut connections = Vec::new();
        for part in parts.iter().filter(|p| p.id != mcu.id) {
            connections.extend(wire_part(part, mcu, &mut alloc, &router));
        }

        let (parts, connections, inserted) = if options.insert_safety_resistors {
            let out = insert_safety_resistors(parts.to_vec(), connections);
            (out.parts, out.connections, out.added)
        } else {
            (parts.to_vec(), connections, Vec::new())
        };

        let warnings = alloc.into_warnings();
        let mut diagram = Diagram::new(&options.author, &options.editor);
        diagram.parts = parts;
        diagram.connections = connections;
        if options.report_pin_exhaustion {
            diagram.warnings = warnings.clone();
        }

        tracing::info!(
            "Synthesized {} diagram: {} parts, {} connections, {} resistors added",
            family,
            diagram.parts.len(),
            diagram.connections.len(),
            inserted.len()
        );

        Synthesis {
            document: Document::Diagram(diagram),
            warnings,
            inserted_resistors: inserted,
            source: DiagramSource::Deterministic,
        }
    }

    /// Deterministic synthesis followed by one call to `oracle`.
    ///
    /// The oracle's diagram replaces the deterministic one only when it keeps
    /// the same number of parts. Any oracle failure is logged and the
    /// deterministic result is returned.
    pub async fn synthesize_with_oracle(
        parts: &[Part],
        options: &SynthesisOptions,
        oracle: Option<&dyn DiagramOracle>,
    ) -> Synthesis {
        let mut synthesis = Self::synthesize(parts, options);
        let Some(oracle) = oracle else {
            return synthesis;
        };
        let Some(initial) = synthesis.diagram() else {
            return synthesis;
        };

        match Self::consult(oracle, initial).await {
            Ok(Some(mut enhanced)) => {
                let protected: HashSet<&str> = initial
                    .parts
                    .iter()
                    .filter(|p| p.protected)
                    .map(|p| p.id.as_str())
                    .collect();
                for part in enhanced.parts.iter_mut() {
                    if protected.contains(part.id.as_str()) {
                        part.protected = true;
                    }
                }

                let unconnected = Netlist::from_diagram(&enhanced).unconnected_parts().len();
                if unconnected > 0 {
                    tracing::warn!(
                        "{} diagram leaves {} parts unconnected",
                        oracle.name(),
                        unconnected
                    );
                }

                tracing::info!("Using diagram from {}", oracle.name());
                synthesis.document = Document::Diagram(enhanced);
                synthesis.source = DiagramSource::Oracle(oracle.name().to_string());
            }
            Ok(None) => {
                tracing::debug!("{} offered no changes", oracle.name());
            }
            Err(e) => {
                tracing::warn!("{} failed, keeping deterministic diagram: {}", oracle.name(), e);
            }
        }
        synthesis
    }

    async fn consult(
        oracle: &dyn DiagramOracle,
        initial: &Diagram,
    ) -> Result<Option<Diagram>, OracleError> {
        let Some(enhanced) = oracle.enhance(initial, &initial.parts).await? else {
            return Ok(None);
        };
        if enhanced.parts.len() != initial.parts.len() {
            return Err(OracleError::PartCountMismatch {
                expected: initial.parts.len(),
                found: enhanced.parts.len(),
            });
        }
        Ok(Some(enhanced))
    }
}
