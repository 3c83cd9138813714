use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::graph::SocialGraph;

pub fn parse_graph(raw: &str) -> Result<SocialGraph> {
    let mut graph: SocialGraph =
        serde_json::from_str(raw).context("invalid social graph JSON")?;

    let mut ego_seen = false;
    for person in &mut graph.persons {
        if !person.is_ego {
            continue;
        }
        if ego_seen {
            tracing::warn!(person = %person.id, "clearing extra ego flag");
            person.is_ego = false;
        }
        ego_seen = true;
    }

    if !ego_seen {
        return Err(anyhow!("graph snapshot has no ego person"));
    }

    if let Some(active) = &graph.active_cohort_id
        && graph.cohort(active).is_none()
    {
        tracing::warn!(cohort = %active, "active cohort does not exist, clearing");
        graph.active_cohort_id = None;
    }

    Ok(graph)
}

pub fn to_json(graph: &SocialGraph) -> Result<String> {
    serde_json::to_string_pretty(graph).context("failed to serialize social graph")
}

pub fn load_graph(path: &Path) -> Result<SocialGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    let graph = parse_graph(&raw)
        .with_context(|| format!("failed to load graph file {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        persons = graph.persons.len(),
        relationships = graph.relationships.len(),
        cohorts = graph.cohorts.len(),
        "loaded social graph"
    );
    Ok(graph)
}

pub fn save_graph(path: &Path, graph: &SocialGraph) -> Result<()> {
    let json = to_json(graph)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("graph path {} has no file name", path.display()))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, json)
        .with_context(|| format!("failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("failed to move graph into place at {}", path.display()))?;

    tracing::info!(path = %path.display(), "saved social graph");
    Ok(())
}
