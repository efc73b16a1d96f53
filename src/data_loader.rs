use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{debug, error, info};

use crate::errors::{AnnotationError, AnnotationResult, BuildError, BuildResult};
use crate::records::{PathwayRecord, SourcedRecord};

const INCHI_PREFIX: &str = "InChI";

/// Reads every `*.json` pathway record in `dir`, ordered by file name.
///
/// A file that cannot be read or parsed is skipped with an error log; only
/// a missing or unreadable directory fails the whole collection.
pub fn load_pathway_records(dir: &Path) -> BuildResult<Vec<SourcedRecord>> {
    let entries = fs::read_dir(dir).map_err(|source| BuildError::InputUnavailable {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(err) => {
                error!("Skipping unreadable entry in {}: {}", dir.display(), err);
                None
            }
        })
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match load_pathway_record(&path) {
            Ok(record) => records.push(record),
            Err(e) => error!("Pathway file {} skipped: {}", path.display(), e),
        }
    }

    info!(
        "Loaded {} pathway record(s) from {}",
        records.len(),
        dir.display()
    );
    Ok(records)
}

/// Reads a single pathway record; the file stem names the source
pub fn load_pathway_record(path: &Path) -> BuildResult<SourcedRecord> {
    let content = fs::read_to_string(path)?;
    let record: PathwayRecord = serde_json::from_str(&content)?;
    let source = source_name(path);
    debug!(
        "Read {} reaction(s) and {} species from {}",
        record.reactions.len(),
        record.species.len(),
        source
    );
    Ok(SourcedRecord::new(source, record))
}

fn source_name(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    // rpSBML dumps keep the double extension
    name.trim_end_matches(".json")
        .trim_end_matches(".xml")
        .trim_end_matches(".sbml")
        .to_string()
}

/// Reference InChIs used for cofactor tagging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CofactorSet {
    inchis: BTreeSet<String>,
}

impl CofactorSet {
    pub fn new<I, S>(inchis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inchis: inchis.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.inchis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inchis.is_empty()
    }

    /// True when any reference InChI occurs within `inchi`
    pub fn matches(&self, inchi: &str) -> bool {
        self.inchis.iter().any(|reference| inchi.contains(reference.as_str()))
    }
}

/// Loads the tab-separated cofactor reference file.
///
/// Column 0 holds either a `#` comment or a full InChI; other columns are
/// ignored. Rows whose first column is not an InChI, or not UTF-8, are
/// skipped.
pub fn load_cofactor_inchis(path: &Path) -> AnnotationResult<CofactorSet> {
    if !path.exists() {
        return Err(AnnotationError::CofactorFileNotFound(
            path.display().to_string(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    let mut inchis = BTreeSet::new();
    for (row, record) in reader.byte_records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                info!("Cofactor row {} skipped: {}", row + 1, e);
                continue;
            }
        };
        let first = match std::str::from_utf8(record.get(0).unwrap_or_default()) {
            Ok(first) => first.trim(),
            Err(_) => {
                info!("Cofactor row {} skipped, not valid UTF-8", row + 1);
                continue;
            }
        };
        if first.starts_with('#') {
            continue;
        }
        if !first.starts_with(INCHI_PREFIX) {
            info!(
                "Cofactor skipped, depiction is not a valid InChI for row {}: {}",
                row + 1,
                first
            );
            continue;
        }
        inchis.insert(first.to_string());
    }

    debug!("Loaded {} cofactor structure(s)", inchis.len());
    Ok(CofactorSet { inchis })
}
