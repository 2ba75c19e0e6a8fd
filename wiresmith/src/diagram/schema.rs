//! Wokwi diagram document types
//!
//! These types serialize to the exact `diagram.json` layout the Wokwi
//! simulator loads: parts as objects, connections as 4-element arrays and
//! wire routes as short direction strings (`"v10"`, `"h-5"`, `"*"`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::mcu::PinWarning;

pub const DIAGRAM_VERSION: u32 = 1;
pub const DEFAULT_AUTHOR: &str = "wiresmith";
pub const DEFAULT_EDITOR: &str = "wokwi";
pub const NO_MCU_ERROR: &str = "No MCU found";

/// A placed component on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(rename = "type")]
    pub part_type: String,

    pub id: String,

    #[serde(default, serialize_with = "coordinate::serialize")]
    pub top: f64,

    #[serde(default, serialize_with = "coordinate::serialize")]
    pub left: f64,

    #[serde(default)]
    pub attrs: Map<String, Value>,

    /// Fields the simulator understands but synthesis does not touch
    /// (`rotate`, `hide`, ...). Kept so a caller's parts come back verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Set once a series resistor has been spliced in front of this part.
    #[serde(skip)]
    pub protected: bool,
}

impl Part {
    pub fn new(part_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            part_type: part_type.into(),
            id: id.into(),
            top: 0.0,
            left: 0.0,
            attrs: Map::new(),
            extra: Map::new(),
            protected: false,
        }
    }

    pub fn at(mut self, top: f64, left: f64) -> Self {
        self.top = top;
        self.left = left;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Reference to one of this part's pins.
    pub fn pin(&self, name: &str) -> PinRef {
        PinRef::new(&self.id, name)
    }
}

/// Canvas coordinates are plain numbers in hand-written diagrams
/// (`"top": 200`), so whole values are written back without a fraction.
mod coordinate {
    use serde::Serializer;

    /// Largest magnitude an f64 holds as an exact integer.
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.fract() == 0.0 && value.abs() < EXACT_LIMIT {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

/// A `part_id:pin_name` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PinRef {
    pub part_id: String,
    pub pin: String,
}

impl PinRef {
    pub fn new(part_id: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
            pin: pin.into(),
        }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.part_id, self.pin)
    }
}

impl FromStr for PinRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Pin names may themselves contain ':' in theory, so split on the first one only.
        match s.split_once(':') {
            Some((part_id, pin)) if !part_id.is_empty() && !pin.is_empty() => {
                Ok(PinRef::new(part_id, pin))
            }
            _ => Err(format!("invalid pin reference '{}', expected 'part:pin'", s)),
        }
    }
}

impl TryFrom<String> for PinRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PinRef> for String {
    fn from(pin: PinRef) -> Self {
        pin.to_string()
    }
}

/// One routing directive of a wire path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PathStep {
    Vertical(i64),
    Horizontal(i64),
    Junction,
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Vertical(n) => write!(f, "v{}", n),
            PathStep::Horizontal(n) => write!(f, "h{}", n),
            PathStep::Junction => write!(f, "*"),
        }
    }
}

impl FromStr for PathStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(PathStep::Junction);
        }
        let mut chars = s.chars();
        let axis = chars.next();
        let amount = chars.as_str();
        let parse_amount = || {
            // Hand-edited diagrams sometimes carry fractional moves ("v-0.01").
            amount
                .parse::<i64>()
                .or_else(|_| amount.parse::<f64>().map(|v| v.trunc() as i64))
                .map_err(|_| format!("invalid wire path step '{}'", s))
        };
        match axis {
            Some('v') => Ok(PathStep::Vertical(parse_amount()?)),
            Some('h') => Ok(PathStep::Horizontal(parse_amount()?)),
            _ => Err(format!("invalid wire path step '{}'", s)),
        }
    }
}

impl TryFrom<String> for PathStep {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PathStep> for String {
    fn from(step: PathStep) -> Self {
        step.to_string()
    }
}

/// Shorthand for building a path from literal directives in rule tables.
pub fn path(steps: &[&str]) -> Vec<PathStep> {
    steps.iter().filter_map(|s| s.parse().ok()).collect()
}

/// A wire between two pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConnectionTuple", into = "ConnectionTuple")]
pub struct Connection {
    pub source: PinRef,
    pub target: PinRef,
    pub color: String,
    pub path: Vec<PathStep>,
}

type ConnectionTuple = (PinRef, PinRef, String, Vec<PathStep>);

impl From<ConnectionTuple> for Connection {
    fn from((source, target, color, path): ConnectionTuple) -> Self {
        Self {
            source,
            target,
            color,
            path,
        }
    }
}

impl From<Connection> for ConnectionTuple {
    fn from(c: Connection) -> Self {
        (c.source, c.target, c.color, c.path)
    }
}

impl Connection {
    pub fn new(
        source: PinRef,
        target: PinRef,
        color: impl Into<String>,
        path: Vec<PathStep>,
    ) -> Self {
        Self {
            source,
            target,
            color: color.into(),
            path,
        }
    }

    pub fn touches(&self, part_id: &str) -> bool {
        self.source.part_id == part_id || self.target.part_id == part_id
    }

    /// The endpoint opposite `pin`, if `pin` is one of the two ends.
    pub fn other_end(&self, pin: &PinRef) -> Option<&PinRef> {
        if &self.source == pin {
            Some(&self.target)
        } else if &self.target == pin {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// The root `diagram.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub version: u32,
    pub author: String,
    pub editor: String,
    pub parts: Vec<Part>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub dependencies: Map<String, Value>,
    /// Only present when pin-exhaustion reporting is switched on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PinWarning>,
}

impl Diagram {
    pub fn new(author: impl Into<String>, editor: impl Into<String>) -> Self {
        Self {
            version: DIAGRAM_VERSION,
            author: author.into(),
            editor: editor.into(),
            parts: Vec::new(),
            connections: Vec::new(),
            dependencies: Map::new(),
            warnings: Vec::new(),
        }
    }

    pub fn part(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn connections_for<'a>(&'a self, part_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |c| c.touches(part_id))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHOR, DEFAULT_EDITOR)
    }
}

/// Error payload emitted in place of a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub error: String,
}

/// What a synthesis run hands back: a diagram, or an inline error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Diagram(Diagram),
    Error(ErrorDocument),
}

impl Document {
    pub fn no_mcu() -> Self {
        Document::Error(ErrorDocument {
            error: NO_MCU_ERROR.to_string(),
        })
    }

    pub fn diagram(&self) -> Option<&Diagram> {
        match self {
            Document::Diagram(d) => Some(d),
            Document::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Document::Error(e) => Some(&e.error),
            Document::Diagram(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Document::Error(_))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
