use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Cross-references of a record: database name -> external ids.
/// Insertion order is kept so xlinks come out in source order.
pub type CrossReferences = IndexMap<String, Vec<String>>;

/// One structured pathway, as dumped by the pathway model parser.
///
/// ```text
/// PathwayRecord
///   ├── pathway.brsynth: { path_id, global_score, dfG_prime_m, fba_obj_*, ... }
///   ├── reactions: { id -> { brsynth: { smiles, rule_id, left, right, ... }, miriam } }
///   └── species:   { id -> { brsynth: { smiles, inchi, inchikey, ... }, miriam } }
/// ```
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PathwayRecord {
    #[serde(default)]
    pub pathway: PathwayAnnotation,
    #[serde(default)]
    pub reactions: IndexMap<String, ReactionRecord>,
    #[serde(default)]
    pub species: IndexMap<String, SpeciesRecord>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PathwayAnnotation {
    #[serde(default)]
    pub brsynth: BTreeMap<String, Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReactionRecord {
    #[serde(default)]
    pub brsynth: ReactionAnnotation,
    #[serde(default)]
    pub miriam: CrossReferences,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReactionAnnotation {
    pub smiles: Option<String>,
    pub rule_id: Option<String>,
    #[serde(default)]
    pub left: IndexMap<String, f64>,
    #[serde(default)]
    pub right: IndexMap<String, f64>,
    pub rule_score: Option<Value>,
    #[serde(rename = "dfG_prime_m")]
    pub dfg_prime_m: Option<Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SpeciesRecord {
    #[serde(default)]
    pub brsynth: SpeciesAnnotation,
    #[serde(default)]
    pub miriam: CrossReferences,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SpeciesAnnotation {
    pub smiles: Option<String>,
    pub inchi: Option<String>,
    pub inchikey: Option<String>,
    #[serde(rename = "dfG_prime_m")]
    pub dfg_prime_m: Option<Value>,
}

/// A pathway record together with the file it was read from
#[derive(Debug, Clone)]
pub struct SourcedRecord {
    pub source: String,
    pub record: PathwayRecord,
}

impl SourcedRecord {
    pub fn new(source: impl Into<String>, record: PathwayRecord) -> Self {
        Self {
            source: source.into(),
            record,
        }
    }

    /// Pathway id declared in the record, falling back to the source name
    pub fn path_id(&self) -> String {
        match self.record.pathway.brsynth.get("path_id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => self.source.clone(),
        }
    }
}

/// Returns the trimmed value when present and non-empty
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Reads a measure stored either as a bare number, a numeric string or
/// a `{"value": ..., "units": ...}` object.
pub fn as_measure(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(map) => map.get("value").and_then(as_measure),
        _ => None,
    }
}
