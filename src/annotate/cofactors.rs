use std::path::Path;
use tracing::{error, info};

use crate::data_loader::{load_cofactor_inchis, CofactorSet};
use crate::graph::PathwayGraph;

/// Marks chemicals whose InChI contains a reference cofactor InChI.
/// Flags are only ever raised, so tagging twice is harmless.
pub fn tag_cofactors(graph: &mut PathwayGraph, cofactors: &CofactorSet) -> usize {
    let mut tagged = 0;
    for (_, chemical) in graph.chemical_nodes_mut() {
        let matches = chemical
            .inchi
            .as_deref()
            .map(|inchi| cofactors.matches(inchi))
            .unwrap_or(false);
        if matches {
            chemical.cofactor = true;
            tagged += 1;
        }
    }
    tagged
}

/// Tags cofactors from the reference file at `path`. An unreadable or
/// missing file leaves the network untouched.
pub fn annotate_cofactors(mut graph: PathwayGraph, path: &Path) -> PathwayGraph {
    match load_cofactor_inchis(path) {
        Ok(cofactors) => {
            let tagged = tag_cofactors(&mut graph, &cofactors);
            info!(
                "Tagged {} chemical(s) as cofactors using {} reference structure(s)",
                tagged,
                cofactors.len()
            );
        }
        Err(e) => error!("{}, cofactors left unmarked", e),
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::chemical_node;
    use crate::graph::tests::reaction_node;

    fn graph() -> PathwayGraph {
        PathwayGraph {
            nodes: vec![
                reaction_node("A>>B", "path_0"),
                chemical_node("WATER", "path_0", Some("InChI=1S/H2O/h1H2")),
                chemical_node("METHANE", "path_0", Some("InChI=1S/CH4/h1H4")),
                chemical_node("UNKNOWN", "path_0", None),
            ],
            edges: Vec::new(),
        }
    }

    fn cofactor(graph: &PathwayGraph, id: &str) -> bool {
        graph.get_node(id).unwrap().as_chemical().unwrap().cofactor
    }

    #[test]
    fn test_tag_cofactors_substring_match() {
        let mut graph = graph();
        let set = CofactorSet::new(["InChI=1S/H2O"]);
        assert_eq!(tag_cofactors(&mut graph, &set), 1);
        assert!(cofactor(&graph, "WATER"));
        assert!(!cofactor(&graph, "METHANE"));
        assert!(!cofactor(&graph, "UNKNOWN"));

        assert_eq!(tag_cofactors(&mut graph, &set), 1);
        assert!(cofactor(&graph, "WATER"));
    }

    #[test]
    fn test_missing_file_leaves_graph_unchanged() {
        let input = graph();
        let annotated = annotate_cofactors(input.clone(), Path::new("/nonexistent/cofactors.tsv"));
        assert_eq!(annotated, input);
    }

    #[test]
    fn test_annotate_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cofactors.tsv");
        std::fs::write(&path, "# inchi\tname\nInChI=1S/CH4/h1H4\tmethane\n").unwrap();

        let annotated = annotate_cofactors(graph(), &path);
        assert!(cofactor(&annotated, "METHANE"));
        assert!(!cofactor(&annotated, "WATER"));
    }

    #[test]
    fn test_undecodable_row_does_not_disable_tagging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cofactors.tsv");
        std::fs::write(&path, b"InChI=1S/H2O/h1H2\twater\n\xff\xfe\tbroken\n").unwrap();

        let annotated = annotate_cofactors(graph(), &path);
        assert!(cofactor(&annotated, "WATER"));
        assert!(!cofactor(&annotated, "METHANE"));
    }
}
