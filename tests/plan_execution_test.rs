use std::fs;

use pathnet::export::{NETWORK_JSON, PATHWAYS_CSV};
use pathnet::plan_execution::execute_plan;
use serde_json::json;

fn write_inputs(dir: &std::path::Path) {
    let pathways = dir.join("pathways");
    fs::create_dir_all(&pathways).unwrap();
    for (file_name, path_id, score) in [("rp_1.json", "rp_1", 0.3), ("rp_2.json", "rp_2", 0.8)] {
        let record = json!({
            "pathway": {"brsynth": {
                "path_id": path_id,
                "global_score": score,
                "fba_obj_fraction": {"value": 0.1}
            }},
            "reactions": {
                "rxn_1": {"brsynth": {
                    "smiles": "A>>B",
                    "left": {"CMPD_A": 1},
                    "right": {"TARGET_B": 1},
                    "rule_score": score
                }}
            },
            "species": {
                "CMPD_A": {"brsynth": {"inchi": "InChI=1S/O2/c1-2"}, "miriam": {"chebi": ["CHEBI:15379"]}},
                "TARGET_B": {"brsynth": {"inchikey": "BBB"}}
            }
        });
        fs::write(pathways.join(file_name), record.to_string()).unwrap();
    }
    fs::write(dir.join("cofactors.tsv"), "InChI=1S/O2/c1-2\toxygen\n").unwrap();
}

#[tokio::test]
async fn test_execute_plan_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let plan_path = dir.path().join("plan.yaml");
    fs::write(
        &plan_path,
        r#"
meta:
  name: demo
input:
  directory: pathways
annotate:
  cofactors: cofactors.tsv
export:
  directory: out
  formats: [json, csv]
"#,
    )
    .unwrap();

    let output = execute_plan(plan_path.to_str().unwrap()).await.unwrap();
    assert_eq!(output.written.len(), 3);
    assert!(dir.path().join("out").join(NETWORK_JSON).exists());

    let graph = &output.collection.graph;
    assert_eq!(graph.nodes.len(), 3);
    let oxygen = graph.get_node("CHEBI:15379").unwrap();
    assert!(oxygen.as_chemical().unwrap().cofactor);
    assert_eq!(
        graph.get_node("A>>B").unwrap().as_reaction().unwrap().rule_score,
        Some(0.8)
    );

    let info = &output.collection.pathways["rp_1"];
    assert_eq!(info.fba_target_flux, Some(0.1));
    assert_eq!(info.scores["global_score"], Some(0.3));

    let csv = fs::read_to_string(dir.path().join("out").join(PATHWAYS_CSV)).unwrap();
    assert_eq!(
        csv.lines().next().unwrap(),
        "path_id,nb_steps,thermo_dg_m_gibbs,fba_target_flux,global_score"
    );
}

#[tokio::test]
async fn test_execute_plan_missing_cofactor_file_still_exports() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let plan_path = dir.path().join("plan.yaml");
    fs::write(
        &plan_path,
        "input:\n  directory: pathways\nannotate:\n  cofactors: nowhere.tsv\nexport:\n  directory: out\n",
    )
    .unwrap();

    let output = execute_plan(plan_path.to_str().unwrap()).await.unwrap();
    assert_eq!(output.written.len(), 3);
    assert!(output
        .collection
        .graph
        .nodes
        .iter()
        .filter_map(|n| n.as_chemical())
        .all(|c| !c.cofactor));
}

#[tokio::test]
async fn test_execute_plan_rejects_duplicate_pathways() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    fs::copy(
        dir.path().join("pathways/rp_1.json"),
        dir.path().join("pathways/rp_1_copy.json"),
    )
    .unwrap();
    let plan_path = dir.path().join("plan.yaml");
    fs::write(
        &plan_path,
        "input:\n  directory: pathways\nmerge:\n  duplicate_pathways: reject\nexport:\n  directory: out\n",
    )
    .unwrap();

    let err = execute_plan(plan_path.to_str().unwrap()).await.unwrap_err();
    assert!(err.to_string().contains("Duplicate pathway id: rp_1"));
}
