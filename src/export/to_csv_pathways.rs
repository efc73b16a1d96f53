use csv::Writer;
use std::collections::BTreeSet;

use crate::errors::BuildResult;
use crate::graph::PathwaysInfo;

const FIXED_HEADERS: [&str; 4] = ["path_id", "nb_steps", "thermo_dg_m_gibbs", "fba_target_flux"];

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// One row per pathway; score columns are the union of every pathway's
/// score names, empty where a pathway lacks the score.
pub fn render(pathways: &PathwaysInfo) -> BuildResult<String> {
    let score_names: BTreeSet<&str> = pathways
        .values()
        .flat_map(|info| info.scores.keys().map(String::as_str))
        .collect();

    let mut wtr = Writer::from_writer(vec![]);
    let headers: Vec<&str> = FIXED_HEADERS.iter().copied().chain(score_names.iter().copied()).collect();
    wtr.write_record(&headers)?;

    for info in pathways.values() {
        let mut row = vec![
            info.path_id.clone(),
            info.nb_steps.to_string(),
            cell(info.thermo_dg_m_gibbs),
            cell(info.fba_target_flux),
        ];
        row.extend(
            score_names
                .iter()
                .map(|name| cell(info.scores.get(*name).copied().flatten())),
        );
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PathwayInfo;

    #[test]
    fn test_render_pathways_table() {
        let mut first = PathwayInfo::new("path_0");
        first.nb_steps = 2;
        first.thermo_dg_m_gibbs = Some(-10.5);
        first.scores.insert("global_score".to_string(), Some(0.5));
        let mut second = PathwayInfo::new("path_1");
        second.nb_steps = 1;
        second.scores.insert("norm_steps".to_string(), None);

        let mut pathways = PathwaysInfo::new();
        pathways.insert(first.path_id.clone(), first);
        pathways.insert(second.path_id.clone(), second);

        let csv = render(&pathways).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "path_id,nb_steps,thermo_dg_m_gibbs,fba_target_flux,global_score,norm_steps",
                "path_0,2,-10.5,,0.5,",
                "path_1,1,,,,",
            ]
        );
    }
}
