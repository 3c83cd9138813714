use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Vec2, vec2};

use crate::app::settings::PhysicsSettings;
use crate::social::{Person, SocialGraph};
use crate::util::stable_pair;

const COHORT_RADIUS_JITTER: f32 = 0.15;
const COHORT_ANGLE_JITTER: f32 = 0.2;
const LOOSE_RADIUS_JITTER: f32 = 0.1;

/// Starting positions for `persons`, in order. Sectors are assigned from the
/// cohorts that have members anywhere in `graph`, so people added later land
/// in the same sector as the cohort they join.
pub fn seed_positions(
    persons: &[&Person],
    graph: &SocialGraph,
    center: Vec2,
    physics: &PhysicsSettings,
) -> Vec<Vec2> {
    let best_bond = graph.best_bond_to_ego();
    let sectors = CohortSectors::new(graph);
    let ring = |person: &Person| physics.ring(best_bond.get(&person.id).copied());

    let mut positions = vec![center; persons.len()];
    let mut loose = Vec::new();

    for (slot, person) in persons.iter().enumerate() {
        if person.is_ego {
            continue;
        }

        let Some(angle) = sectors.blended_angle(person) else {
            loose.push(slot);
            continue;
        };

        let (radius_noise, angle_noise) = stable_pair(&person.id);
        let radius = ring(person);
        let radius = radius + radius_noise * radius * COHORT_RADIUS_JITTER;
        let angle = angle + angle_noise * sectors.size * COHORT_ANGLE_JITTER;
        positions[slot] = center + polar(angle, radius);
    }

    if loose.is_empty() {
        return positions;
    }

    let (start, spread) = sectors.loose_arc();
    for (order, &slot) in loose.iter().enumerate() {
        let person = persons[slot];
        let fraction = if loose.len() > 1 {
            order as f32 / (loose.len() - 1) as f32
        } else {
            0.5
        };
        let angle = start + (fraction - 0.5) * spread;

        let (radius_noise, _) = stable_pair(&person.id);
        let radius = ring(person);
        let radius = radius + radius_noise * radius * LOOSE_RADIUS_JITTER;
        positions[slot] = center + polar(angle, radius);
    }

    positions
}

fn polar(angle: f32, radius: f32) -> Vec2 {
    vec2(angle.cos(), angle.sin()) * radius
}

struct CohortSectors {
    angle_by_cohort: HashMap<String, f32>,
    active: usize,
    size: f32,
}

impl CohortSectors {
    fn new(graph: &SocialGraph) -> Self {
        let active = graph
            .cohorts
            .iter()
            .filter(|cohort| graph.members_of(&cohort.id).any(|person| !person.is_ego))
            .map(|cohort| cohort.id.clone())
            .collect::<Vec<_>>();

        let size = if active.is_empty() {
            0.0
        } else {
            TAU / active.len() as f32
        };

        let angle_by_cohort = active
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index as f32 * size - FRAC_PI_2))
            .collect();

        Self {
            angle_by_cohort,
            active: active.len(),
            size,
        }
    }

    fn blended_angle(&self, person: &Person) -> Option<f32> {
        let angles = person
            .cohort_ids
            .iter()
            .filter_map(|id| self.angle_by_cohort.get(id))
            .collect::<Vec<_>>();
        if angles.is_empty() {
            return None;
        }
        Some(angles.iter().copied().sum::<f32>() / angles.len() as f32)
    }

    /// Center and width of the arc reserved for people outside every cohort.
    fn loose_arc(&self) -> (f32, f32) {
        if self.active == 0 {
            return (0.0, TAU);
        }
        let start = self.active as f32 * self.size - FRAC_PI_2 + self.size * 0.5;
        (start, self.size.min(FRAC_PI_2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::RelationshipType;

    fn angle_of(point: Vec2, center: Vec2) -> f32 {
        let delta = point - center;
        delta.y.atan2(delta.x)
    }

    #[test]
    fn ego_sits_on_center_and_rings_follow_bonds() {
        let mut graph = SocialGraph::new("seed");
        let ego = graph.ego_id().expect("ego").to_owned();
        let close = graph.add_person("Close", Vec::new());
        let far = graph.add_person("Far", Vec::new());
        let stranger = graph.add_person("Stranger", Vec::new());
        graph
            .add_relationship(&ego, &close, RelationshipType::BestFriend)
            .expect("link");
        graph
            .add_relationship(&ego, &far, RelationshipType::Acquaintance)
            .expect("link");

        let physics = PhysicsSettings::default();
        let center = vec2(400.0, 300.0);
        let persons = graph.persons.iter().collect::<Vec<_>>();
        let positions = seed_positions(&persons, &graph, center, &physics);

        assert_eq!(positions[0], center);
        let distance = |id: &str| {
            let slot = graph.persons.iter().position(|p| p.id == id).expect("slot");
            (positions[slot] - center).length()
        };
        assert!((distance(&close) - 100.0).abs() <= 10.0 + 1e-3);
        assert!((distance(&far) - 500.0).abs() <= 50.0 + 1e-3);
        assert!((distance(&stranger) - 350.0).abs() <= 35.0 + 1e-3);
    }

    #[test]
    fn cohort_members_land_in_their_sector() {
        let mut graph = SocialGraph::new("seed");
        let school = graph.add_cohort("School");
        let work = graph.add_cohort("Work");
        let pupil = graph.add_person("Pupil", vec![school.clone()]);
        let worker = graph.add_person("Worker", vec![work.clone()]);
        let both = graph.add_person("Both", vec![school, work]);

        let physics = PhysicsSettings::default();
        let center = Vec2::ZERO;
        let persons = graph.persons.iter().collect::<Vec<_>>();
        let positions = seed_positions(&persons, &graph, center, &physics);

        let slot = |id: &str| graph.persons.iter().position(|p| p.id == id).expect("slot");
        let sector = std::f32::consts::PI;
        let tolerance = sector * COHORT_ANGLE_JITTER + 1e-3;

        // School at -pi/2, Work at +pi/2, the overlap blends to 0.
        assert!((angle_of(positions[slot(&pupil)], center) + FRAC_PI_2).abs() <= tolerance);
        assert!((angle_of(positions[slot(&worker)], center) - FRAC_PI_2).abs() <= tolerance);
        assert!(angle_of(positions[slot(&both)], center).abs() <= tolerance);
    }

    #[test]
    fn loose_people_spread_over_reserved_arc() {
        let mut graph = SocialGraph::new("seed");
        let ids = (0..5)
            .map(|index| graph.add_person(format!("p{index}"), Vec::new()))
            .collect::<Vec<_>>();

        let physics = PhysicsSettings::default();
        let persons = graph.persons.iter().collect::<Vec<_>>();
        let positions = seed_positions(&persons, &graph, Vec2::ZERO, &physics);

        // no cohorts: the whole circle from -pi to pi, first and last coincide
        let first = graph.persons.iter().position(|p| p.id == ids[0]).expect("slot");
        let middle = graph.persons.iter().position(|p| p.id == ids[2]).expect("slot");
        assert!((angle_of(positions[first], Vec2::ZERO).abs() - std::f32::consts::PI).abs() < 1e-3);
        assert!(angle_of(positions[middle], Vec2::ZERO).abs() < 1e-3);
    }

    #[test]
    fn seeding_is_deterministic() {
        let graph = crate::social::demo_graph();
        let physics = PhysicsSettings::default();
        let persons = graph.persons.iter().collect::<Vec<_>>();
        let first = seed_positions(&persons, &graph, Vec2::ZERO, &physics);
        let second = seed_positions(&persons, &graph, Vec2::ZERO, &physics);
        assert_eq!(first, second);
    }
}
