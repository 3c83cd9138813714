mod forces;
mod quadtree;
mod seed;

use std::collections::HashMap;

use eframe::egui::Vec2;

use super::settings::PhysicsSettings;
use crate::social::{BondStrength, Person, RelationshipType, SocialGraph};
pub use forces::cohort_cluster_deltas;
use forces::{
    ChargeParams, accumulate_charge_for_node, apply_center, apply_links, apply_radial,
    collect_collision_pairs, resolve_collision,
};
pub(in crate::app) use quadtree::QuadNode;
pub use seed::seed_positions;

/// One person as the simulation sees it. Only the simulation writes these.
#[derive(Clone, Debug)]
pub struct SimNode {
    pub id: String,
    pub is_ego: bool,
    pub cohorts: Vec<usize>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pin: Option<Vec2>,
    pub degree: usize,
    pub bond_to_ego: Option<BondStrength>,
    pub radius: f32,
    pub collide_radius: f32,
    pub ring: Option<f32>,
    pub added_at: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct SimLink {
    pub relationship_id: String,
    pub source: usize,
    pub target: usize,
    pub kind: RelationshipType,
    distance: f32,
    strength: f32,
    /// Share of the correction applied to the target end.
    bias: f32,
}

impl SimLink {
    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }
}

/// Simulation state carried across a resync for people that already had it.
#[derive(Clone, Copy, Debug)]
struct NodeState {
    position: Vec2,
    velocity: Vec2,
    pin: Option<Vec2>,
    added_at: Option<f64>,
}

enum Slot {
    Known(NodeState),
    Fresh,
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    charges: Vec<f32>,
    radii: Vec<f32>,
    pairs: Vec<(usize, usize)>,
    memberships: Vec<Vec<usize>>,
    is_ego: Vec<bool>,
}

pub struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    index_by_id: HashMap<String, usize>,
    cohort_count: usize,
    ego_index: Option<usize>,
    max_degree: usize,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    cluster_strength: f32,
    radial_strength_node: f32,
    settings: PhysicsSettings,
    ticks: u64,
    scratch: PhysicsScratch,
}

impl Simulation {
    /// A simulation with nothing placed yet. It stays idle until a
    /// [`Simulation::resync`] hands it people.
    pub fn empty(center: Vec2, settings: PhysicsSettings) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            index_by_id: HashMap::new(),
            cohort_count: 0,
            ego_index: None,
            max_degree: 1,
            center,
            alpha: 0.0,
            alpha_target: 0.0,
            running: false,
            cluster_strength: settings.cluster_strength,
            radial_strength_node: settings.radial_strength_node,
            settings,
            ticks: 0,
            scratch: PhysicsScratch::default(),
        }
    }

    /// Seeds every person around `center` and settles the layout before it is
    /// ever shown.
    pub fn new(graph: &SocialGraph, center: Vec2, settings: PhysicsSettings) -> Self {
        let mut simulation = Self::empty(center, settings);
        let slots = graph.persons.iter().map(|_| Slot::Fresh).collect();
        simulation.rebuild(graph, slots, None);
        simulation.warm_up();
        simulation
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&SimNode> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn position_of(&self, id: &str) -> Option<Vec2> {
        self.index_of(id).map(|index| self.nodes[index].position)
    }

    pub fn links(&self) -> &[SimLink] {
        &self.links
    }

    pub fn ego_index(&self) -> Option<usize> {
        self.ego_index
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Largest radius any node can be drawn with.
    pub fn max_radius(&self) -> f32 {
        self.nodes
            .iter()
            .map(|node| node.radius)
            .fold(self.settings.ego_radius, f32::max)
    }

    pub fn set_settings(&mut self, settings: PhysicsSettings) {
        self.settings = settings;
        self.cluster_strength = self.settings.cluster_strength;
        self.radial_strength_node = self.settings.radial_strength_node;
        self.refresh_parameters();
        self.reheat();
    }

    pub fn is_active(&self) -> bool {
        self.running && !self.is_settled()
    }

    fn is_settled(&self) -> bool {
        self.alpha < self.settings.alpha_min && self.alpha_target < self.settings.alpha_min
    }

    /// Mean speed of the free nodes.
    pub fn energy(&self) -> f32 {
        let free = self.nodes.iter().filter(|node| node.pin.is_none());
        let (sum, count) = free.fold((0.0, 0usize), |(sum, count), node| {
            (sum + node.velocity.length(), count + 1)
        });
        if count == 0 { 0.0 } else { sum / count as f32 }
    }

    pub fn reheat(&mut self) {
        self.alpha = self.settings.reheat_alpha;
        self.running = true;
        tracing::debug!(alpha = self.alpha, "simulation reheated");
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target;
    }

    pub fn restart(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Fixes a node at `position` until [`Simulation::unpin`]. The ego stays on
    /// the viewport center and ignores this.
    pub fn pin(&mut self, index: usize, position: Vec2) {
        if Some(index) == self.ego_index {
            return;
        }
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(position);
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if Some(index) == self.ego_index {
            return;
        }
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// Moves the center target and the ego with it, then reheats so the rest
    /// of the graph follows.
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
        if let Some(ego) = self.ego_index.and_then(|index| self.nodes.get_mut(index)) {
            ego.pin = Some(center);
            ego.position = center;
            ego.velocity = Vec2::ZERO;
        }
        self.reheat();
    }

    /// Rebuilds from a fresh snapshot. People already simulated keep their
    /// state; new ones are seeded and stamped with `now` for fade-in.
    pub fn resync(&mut self, graph: &SocialGraph, now: f64) {
        let mut previous = self
            .nodes
            .drain(..)
            .map(|node| {
                let state = NodeState {
                    position: node.position,
                    velocity: node.velocity,
                    pin: node.pin,
                    added_at: node.added_at,
                };
                (node.id, state)
            })
            .collect::<HashMap<_, _>>();

        let slots = graph
            .persons
            .iter()
            .map(|person| match previous.remove(&person.id) {
                Some(state) => Slot::Known(state),
                None => Slot::Fresh,
            })
            .collect::<Vec<_>>();

        let fresh = slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Fresh))
            .count();
        self.rebuild(graph, slots, Some(now));
        self.reheat();

        tracing::info!(
            nodes = self.nodes.len(),
            links = self.links.len(),
            fresh,
            removed = previous.len(),
            "simulation resynced"
        );
    }

    fn rebuild(&mut self, graph: &SocialGraph, slots: Vec<Slot>, now: Option<f64>) {
        let fresh_persons = graph
            .persons
            .iter()
            .zip(&slots)
            .filter(|(_, slot)| matches!(slot, Slot::Fresh))
            .map(|(person, _)| person)
            .collect::<Vec<&Person>>();
        let mut seeded = seed_positions(&fresh_persons, graph, self.center, &self.settings)
            .into_iter();

        let cohort_index = graph
            .cohorts
            .iter()
            .enumerate()
            .map(|(index, cohort)| (cohort.id.as_str(), index))
            .collect::<HashMap<_, _>>();
        let degrees = graph.degree_stats();
        let best_bond = graph.best_bond_to_ego();

        self.nodes.clear();
        self.index_by_id.clear();
        self.ego_index = None;
        self.cohort_count = graph.cohorts.len();
        self.max_degree = degrees.max_degree;

        for (person, slot) in graph.persons.iter().zip(slots) {
            let state = match slot {
                Slot::Known(state) => state,
                Slot::Fresh => NodeState {
                    position: seeded.next().unwrap_or(self.center),
                    velocity: Vec2::ZERO,
                    pin: None,
                    added_at: now,
                },
            };

            let index = self.nodes.len();
            let (position, pin) = if person.is_ego && self.ego_index.is_none() {
                self.ego_index = Some(index);
                (self.center, Some(self.center))
            } else {
                (state.position, state.pin)
            };

            self.index_by_id.insert(person.id.clone(), index);
            self.nodes.push(SimNode {
                id: person.id.clone(),
                is_ego: person.is_ego,
                cohorts: person
                    .cohort_ids
                    .iter()
                    .filter_map(|id| cohort_index.get(id.as_str()).copied())
                    .collect(),
                position,
                velocity: if pin.is_some() { Vec2::ZERO } else { state.velocity },
                pin,
                degree: degrees.of(&person.id),
                bond_to_ego: best_bond.get(&person.id).copied(),
                radius: 0.0,
                collide_radius: 0.0,
                ring: None,
                added_at: if person.is_ego { None } else { state.added_at },
            });
        }

        self.links.clear();
        let mut dropped = 0usize;
        for relationship in &graph.relationships {
            let endpoints = (
                self.index_of(&relationship.source_id),
                self.index_of(&relationship.target_id),
            );
            let (Some(source), Some(target)) = endpoints else {
                dropped += 1;
                continue;
            };
            if source == target {
                dropped += 1;
                continue;
            }

            self.links.push(SimLink {
                relationship_id: relationship.id.clone(),
                source,
                target,
                kind: relationship.kind,
                distance: 0.0,
                strength: 0.0,
                bias: 0.5,
            });
        }
        if dropped > 0 {
            tracing::warn!(dropped, "skipped relationships with missing or identical endpoints");
        }

        self.refresh_parameters();
    }

    /// Radii, rings and spring parameters from the current settings.
    fn refresh_parameters(&mut self) {
        let settings = &self.settings;
        let has_ego = self.ego_index.is_some();
        for node in &mut self.nodes {
            node.radius = settings.visual_radius(node.degree, self.max_degree, node.is_ego);
            node.collide_radius = settings.collide_radius(node.radius, node.degree);
            node.ring = match (has_ego, node.is_ego) {
                (false, _) => None,
                (true, true) => Some(0.0),
                (true, false) => Some(settings.ring(node.bond_to_ego)),
            };
        }

        let mut link_count = vec![0usize; self.nodes.len()];
        for link in &self.links {
            link_count[link.source] += 1;
            link_count[link.target] += 1;
        }
        for link in &mut self.links {
            let bond = link.kind.bond();
            let source_count = link_count[link.source] as f32;
            let target_count = link_count[link.target] as f32;
            link.distance = settings.link_distance(bond);
            link.strength = settings.link_strength(bond);
            link.bias = source_count / (source_count + target_count);
        }
    }

    /// Settles a freshly seeded layout without drawing it: boosted clustering
    /// and radial pull from full heat, then back to normal strengths.
    pub fn warm_up(&mut self) {
        self.cluster_strength = self.settings.warmup_cluster_strength;
        self.radial_strength_node = self.settings.warmup_radial_strength;
        self.alpha = 1.0;
        self.running = true;

        let mut ticks = 0usize;
        for _ in 0..self.settings.warmup_ticks {
            if !self.tick() {
                break;
            }
            ticks += 1;
        }

        self.cluster_strength = self.settings.cluster_strength;
        self.radial_strength_node = self.settings.radial_strength_node;
        self.alpha = self.settings.settle_alpha;

        tracing::info!(
            nodes = self.nodes.len(),
            ticks,
            energy = self.energy(),
            "layout warmed up"
        );
    }

    /// Advances one step. Returns false when cooled down or stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.is_settled() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.settings.alpha_decay;
        let alpha = self.alpha;

        apply_links(&mut self.nodes, &self.links, alpha);
        self.apply_charge(alpha);
        apply_center(
            &mut self.nodes,
            self.center,
            self.settings.center_strength,
            alpha,
        );
        self.apply_collisions();
        if let Some(ego) = self.ego_index {
            let origin = self.nodes[ego].position;
            apply_radial(
                &mut self.nodes,
                origin,
                self.radial_strength_node,
                self.settings.radial_strength_ego,
                alpha,
            );
        }
        self.apply_cluster(alpha);

        let keep = 1.0 - self.settings.velocity_decay;
        for node in &mut self.nodes {
            match node.pin {
                Some(pin) => {
                    node.position = pin;
                    node.velocity = Vec2::ZERO;
                }
                None => {
                    node.velocity *= keep;
                    node.position += node.velocity;
                }
            }
        }

        self.ticks += 1;
        if self.is_settled() {
            tracing::debug!(ticks = self.ticks, "simulation settled");
        }
        true
    }

    fn apply_charge(&mut self, alpha: f32) {
        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.charges.clear();
        for node in &self.nodes {
            scratch.positions.push(node.position);
            scratch.charges.push(-(node.radius * node.radius) / 2.0);
        }

        let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges, &[]) else {
            return;
        };

        let params = ChargeParams {
            alpha,
            theta: self.settings.charge_theta,
            distance_max_sq: self.settings.charge_distance_max * self.settings.charge_distance_max,
        };
        for (index, node) in self.nodes.iter_mut().enumerate() {
            accumulate_charge_for_node(
                &tree,
                index,
                &scratch.positions,
                &scratch.charges,
                params,
                &mut node.velocity,
            );
        }
    }

    fn apply_collisions(&mut self) {
        if self.nodes.len() < 2 {
            return;
        }

        for _ in 0..self.settings.collide_iterations {
            let scratch = &mut self.scratch;
            scratch.positions.clear();
            scratch.radii.clear();
            for node in &self.nodes {
                scratch.positions.push(node.position + node.velocity);
                scratch.radii.push(node.collide_radius);
            }

            let Some(tree) = QuadNode::build(&scratch.positions, &[], &scratch.radii) else {
                return;
            };

            scratch.pairs.clear();
            collect_collision_pairs(&tree, &tree, true, &mut scratch.pairs);
            for &(a, b) in &scratch.pairs {
                resolve_collision(&mut self.nodes, a, b, self.settings.collide_strength);
            }
        }
    }

    fn apply_cluster(&mut self, alpha: f32) {
        if self.cohort_count == 0 || self.cluster_strength == 0.0 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.memberships.clear();
        scratch.is_ego.clear();
        for node in &self.nodes {
            scratch.positions.push(node.position);
            scratch.memberships.push(node.cohorts.clone());
            scratch.is_ego.push(node.is_ego);
        }

        let deltas = cohort_cluster_deltas(
            &scratch.positions,
            &scratch.memberships,
            &scratch.is_ego,
            self.cohort_count,
            self.cluster_strength,
            alpha,
        );
        for (node, delta) in self.nodes.iter_mut().zip(deltas) {
            node.velocity += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::social::{GraphMetadata, Relationship, demo_graph};

    fn settle(simulation: &mut Simulation) -> usize {
        let mut ticks = 0;
        while simulation.tick() {
            ticks += 1;
            assert!(ticks < 2_000, "simulation never cooled down");
        }
        ticks
    }

    fn ring_graph() -> (SocialGraph, [String; 3]) {
        let mut graph = SocialGraph::new("rings");
        let ego = graph.ego_id().expect("ego").to_owned();
        let x = graph.add_person("X", Vec::new());
        let y = graph.add_person("Y", Vec::new());
        let z = graph.add_person("Z", Vec::new());
        graph
            .add_relationship(&ego, &x, RelationshipType::BestFriend)
            .expect("x");
        graph
            .add_relationship(&ego, &y, RelationshipType::Friend)
            .expect("y");
        graph
            .add_relationship(&ego, &z, RelationshipType::Acquaintance)
            .expect("z");
        (graph, [x, y, z])
    }

    #[test]
    fn bond_strength_orders_distance_from_ego() {
        let (graph, [x, y, z]) = ring_graph();
        let center = vec2(400.0, 300.0);
        let mut simulation = Simulation::new(&graph, center, PhysicsSettings::default());

        let distance = |simulation: &Simulation, id: &str| {
            (simulation.position_of(id).expect("node") - center).length()
        };
        assert!(distance(&simulation, &x) < distance(&simulation, &y));
        assert!(distance(&simulation, &y) < distance(&simulation, &z));

        settle(&mut simulation);
        assert!(distance(&simulation, &x) < distance(&simulation, &y));
        assert!(distance(&simulation, &y) < distance(&simulation, &z));
    }

    #[test]
    fn ego_never_leaves_the_center() {
        let graph = demo_graph();
        let center = vec2(640.0, 360.0);
        let mut simulation = Simulation::new(&graph, center, PhysicsSettings::default());
        let ego = simulation.ego_index().expect("ego");

        assert_eq!(simulation.nodes()[ego].position, center);
        simulation.unpin(ego);
        simulation.pin(ego, vec2(0.0, 0.0));
        for _ in 0..50 {
            simulation.tick();
            assert_eq!(simulation.nodes()[ego].position, center);
        }

        let moved = vec2(100.0, 80.0);
        simulation.set_center(moved);
        assert_eq!(simulation.nodes()[ego].position, moved);
        assert_eq!(simulation.center(), moved);
        assert_eq!(simulation.alpha(), PhysicsSettings::default().reheat_alpha);
        for _ in 0..50 {
            simulation.tick();
            assert_eq!(simulation.nodes()[ego].position, moved);
        }
    }

    #[test]
    fn ticking_converges_and_stops() {
        let graph = demo_graph();
        let mut simulation = Simulation::new(&graph, Vec2::ZERO, PhysicsSettings::default());

        while simulation.alpha() >= 0.002 {
            assert!(simulation.tick());
        }
        let before = simulation
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        assert!(simulation.tick());
        let largest_step = simulation
            .nodes()
            .iter()
            .zip(&before)
            .map(|(node, old)| (node.position - *old).length())
            .fold(0.0, f32::max);
        assert!(largest_step < 1.0, "still moving {largest_step} per tick");

        settle(&mut simulation);
        assert!(!simulation.is_active());
        let frozen = simulation
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        assert!(!simulation.tick());
        assert!(
            simulation
                .nodes()
                .iter()
                .zip(&frozen)
                .all(|(node, old)| node.position == *old)
        );
    }

    fn assert_no_overlap(simulation: &Simulation) {
        let nodes = simulation.nodes();
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                let distance = (a.position - b.position).length();
                assert!(
                    distance >= a.radius + b.radius - 0.5,
                    "{} and {} overlap: {distance}",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn warmed_up_and_settled_layouts_have_no_overlapping_nodes() {
        let graph = demo_graph();
        let mut simulation = Simulation::new(&graph, Vec2::ZERO, PhysicsSettings::default());
        assert_no_overlap(&simulation);

        settle(&mut simulation);
        assert_no_overlap(&simulation);
    }

    #[test]
    fn empty_simulation_idles_until_resynced() {
        let graph = demo_graph();
        let mut simulation = Simulation::empty(vec2(400.0, 300.0), PhysicsSettings::default());
        assert!(simulation.nodes().is_empty());
        assert!(!simulation.is_active());
        assert!(!simulation.tick());
        assert_eq!(simulation.ticks(), 0);

        simulation.resync(&graph, 1.0);
        assert_eq!(simulation.nodes().len(), graph.persons.len());
        let ego = simulation.ego_index().expect("ego");
        assert_eq!(simulation.nodes()[ego].position, vec2(400.0, 300.0));
        assert!(simulation.is_active());
    }

    #[test]
    fn drag_pin_holds_until_released() {
        let (graph, [x, ..]) = ring_graph();
        let mut simulation = Simulation::new(&graph, Vec2::ZERO, PhysicsSettings::default());
        let index = simulation.index_of(&x).expect("x");
        let target = vec2(250.0, -40.0);

        simulation.pin(index, target);
        simulation.set_alpha_target(0.3);
        simulation.restart();
        simulation.tick();
        assert_eq!(simulation.nodes()[index].position, target);
        assert_eq!(simulation.nodes()[index].velocity, Vec2::ZERO);

        simulation.unpin(index);
        simulation.set_alpha_target(0.0);
        assert!(simulation.nodes()[index].pin.is_none());
    }

    #[test]
    fn resync_keeps_known_nodes_and_seeds_new_ones() {
        let (mut graph, [x, y, z]) = ring_graph();
        let mut simulation = Simulation::new(&graph, Vec2::ZERO, PhysicsSettings::default());
        let before = simulation.position_of(&x).expect("x");

        let ego = graph.ego_id().expect("ego").to_owned();
        let newcomer = graph.add_person("New", Vec::new());
        graph
            .add_relationship(&ego, &newcomer, RelationshipType::Family)
            .expect("link");
        graph.remove_person(&z).expect("remove z");
        simulation.resync(&graph, 12.5);

        assert_eq!(simulation.position_of(&x), Some(before));
        assert!(simulation.index_of(&z).is_none());
        assert!(simulation.index_of(&y).is_some());

        let fresh = &simulation.nodes()[simulation.index_of(&newcomer).expect("new")];
        assert_eq!(fresh.added_at, Some(12.5));
        assert_eq!(fresh.ring, Some(180.0));
        assert!(simulation.nodes()[simulation.index_of(&x).expect("x")].added_at.is_none());
        assert_eq!(simulation.links().len(), 3);
        assert_eq!(simulation.alpha(), PhysicsSettings::default().reheat_alpha);
    }

    #[test]
    fn dangling_relationships_are_dropped() {
        let (mut graph, [x, ..]) = ring_graph();
        graph.relationships.push(Relationship {
            id: "ghost-link".to_owned(),
            source_id: x.clone(),
            target_id: "ghost".to_owned(),
            kind: RelationshipType::Friend,
            label: None,
            notes: None,
        });

        let simulation = Simulation::new(&graph, Vec2::ZERO, PhysicsSettings::default());
        assert_eq!(simulation.links().len(), 3);
        assert!(
            simulation
                .links()
                .iter()
                .all(|link| link.relationship_id != "ghost-link")
        );
    }

    #[test]
    fn graph_without_ego_skips_radial_targets() {
        let graph = SocialGraph {
            persons: vec![
                Person {
                    id: "a".to_owned(),
                    name: "A".to_owned(),
                    cohort_ids: Vec::new(),
                    is_ego: false,
                    notes: None,
                },
                Person {
                    id: "b".to_owned(),
                    name: "B".to_owned(),
                    cohort_ids: Vec::new(),
                    is_ego: false,
                    notes: None,
                },
            ],
            relationships: Vec::new(),
            cohorts: Vec::new(),
            active_cohort_id: None,
            metadata: GraphMetadata {
                title: "no ego".to_owned(),
                created_at: String::new(),
                updated_at: String::new(),
            },
        };

        let mut simulation = Simulation::new(&graph, Vec2::ZERO, PhysicsSettings::default());
        assert!(simulation.ego_index().is_none());
        assert!(simulation.nodes().iter().all(|node| node.ring.is_none()));
        settle(&mut simulation);
        assert!(
            simulation
                .nodes()
                .iter()
                .all(|node| node.position.x.is_finite() && node.position.y.is_finite())
        );
    }

    #[test]
    fn single_ego_graph_is_stable() {
        let graph = SocialGraph::new("alone");
        let center = vec2(10.0, 20.0);
        let mut simulation = Simulation::new(&graph, center, PhysicsSettings::default());
        settle(&mut simulation);
        assert_eq!(simulation.nodes()[0].position, center);
    }

    #[test]
    fn stop_and_restart_gate_ticking() {
        let (graph, _) = ring_graph();
        let mut simulation = Simulation::new(&graph, Vec2::ZERO, PhysicsSettings::default());
        simulation.stop();
        assert!(!simulation.is_active());
        assert!(!simulation.tick());
        simulation.restart();
        assert!(simulation.tick());
    }
}
