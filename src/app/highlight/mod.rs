use std::collections::HashSet;

use super::physics::Simulation;

/// Hovered node, its direct neighbours, and the links between them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
    pub nodes: HashSet<usize>,
    pub links: HashSet<usize>,
}

impl HighlightState {
    pub fn contains_node(&self, index: usize) -> bool {
        self.nodes.contains(&index)
    }

    pub fn contains_link(&self, index: usize) -> bool {
        self.links.contains(&index)
    }
}

pub fn build_highlight_state(simulation: &Simulation, hovered: usize) -> Option<HighlightState> {
    simulation.node(hovered)?;

    let mut state = HighlightState::default();
    state.nodes.insert(hovered);
    for (index, link) in simulation.links().iter().enumerate() {
        if !link.touches(hovered) {
            continue;
        }
        state.links.insert(index);
        state.nodes.insert(link.source);
        state.nodes.insert(link.target);
    }
    Some(state)
}

#[cfg(test)]
mod tests {
    use eframe::egui::Vec2;

    use super::*;
    use crate::app::settings::PhysicsSettings;
    use crate::social::{RelationshipType, SocialGraph};

    #[test]
    fn hover_collects_neighbours_and_incident_links() {
        let mut graph = SocialGraph::new("hover");
        let ego = graph.ego_id().expect("ego").to_owned();
        let a = graph.add_person("A", Vec::new());
        let b = graph.add_person("B", Vec::new());
        let c = graph.add_person("C", Vec::new());
        graph
            .add_relationship(&ego, &a, RelationshipType::Friend)
            .expect("link");
        graph
            .add_relationship(&a, &b, RelationshipType::Friend)
            .expect("link");
        graph
            .add_relationship(&b, &c, RelationshipType::Friend)
            .expect("link");

        let simulation = Simulation::new(&graph, Vec2::ZERO, PhysicsSettings::default());
        let index = |id: &str| simulation.index_of(id).expect("node");
        let state = build_highlight_state(&simulation, index(&a)).expect("state");

        assert_eq!(
            state.nodes,
            HashSet::from([index(&ego), index(&a), index(&b)])
        );
        assert_eq!(state.links, HashSet::from([0, 1]));
        assert!(!state.contains_node(index(&c)));
        assert!(build_highlight_state(&simulation, 99).is_none());
    }
}
