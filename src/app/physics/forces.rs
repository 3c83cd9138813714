use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;
use super::{SimLink, SimNode};

const GOLDEN_ANGLE: f32 = 0.618_034;
const JIGGLE: f32 = 1e-6;
const CHARGE_DISTANCE_MIN_SQ: f32 = 1.0;

/// Direction used when two points coincide, derived from the pair so repeated
/// runs agree.
pub(super) fn coincident_offset(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * GOLDEN_ANGLE + (b as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin()) * JIGGLE
}

fn nonzero(delta: Vec2, a: usize, b: usize) -> Vec2 {
    if delta.x == 0.0 && delta.y == 0.0 {
        coincident_offset(a, b)
    } else {
        delta
    }
}

/// Springs on predicted positions. The correction is split between the ends
/// by degree so hubs move less than leaves.
pub(super) fn apply_links(nodes: &mut [SimNode], links: &[SimLink], alpha: f32) {
    for link in links {
        let (source, target) = (link.source, link.target);
        let predicted_source = nodes[source].position + nodes[source].velocity;
        let predicted_target = nodes[target].position + nodes[target].velocity;
        let delta = nonzero(predicted_target - predicted_source, source, target);

        let length = delta.length();
        let scale = (length - link.distance) / length * alpha * link.strength;
        let correction = delta * scale;

        nodes[target].velocity -= correction * link.bias;
        nodes[source].velocity += correction * (1.0 - link.bias);
    }
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) alpha: f32,
    pub(super) theta: f32,
    pub(super) distance_max_sq: f32,
}

/// Barnes-Hut many-body pass for one node. Negative charges repel.
pub(super) fn accumulate_charge_for_node(
    cell: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if cell.charge == 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.indices {
            if other == index {
                continue;
            }
            let delta = nonzero(positions[other] - point, index, other);
            let mut distance_sq = delta.length_sq();
            if distance_sq >= params.distance_max_sq {
                continue;
            }
            if distance_sq < CHARGE_DISTANCE_MIN_SQ {
                distance_sq = (CHARGE_DISTANCE_MIN_SQ * distance_sq).sqrt();
            }
            *velocity += delta * (charges[other] * params.alpha / distance_sq);
        }
        return;
    }

    let delta = cell.center_of_charge - point;
    let mut distance_sq = delta.length_sq();
    let width = cell.bounds.side_length();
    let can_approximate = !cell.bounds.contains(point)
        && (width * width) / (params.theta * params.theta) < distance_sq;

    if can_approximate {
        if distance_sq < params.distance_max_sq {
            if distance_sq < CHARGE_DISTANCE_MIN_SQ {
                distance_sq = (CHARGE_DISTANCE_MIN_SQ * distance_sq).sqrt();
            }
            *velocity += delta * (cell.charge * params.alpha / distance_sq);
        }
        return;
    }

    if cell.bounds.distance_sq_to_point(point) >= params.distance_max_sq {
        return;
    }

    for child in cell.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, charges, params, velocity);
    }
}

pub(super) fn apply_center(nodes: &mut [SimNode], center: Vec2, strength: f32, alpha: f32) {
    let k = strength * alpha;
    for node in nodes {
        node.velocity += (center - node.position) * k;
    }
}

/// Pulls every node with a ring toward that distance from `origin`.
pub(super) fn apply_radial(
    nodes: &mut [SimNode],
    origin: Vec2,
    node_strength: f32,
    ego_strength: f32,
    alpha: f32,
) {
    for (index, node) in nodes.iter_mut().enumerate() {
        let Some(ring) = node.ring else {
            continue;
        };
        let strength = if node.is_ego { ego_strength } else { node_strength };
        let delta = nonzero(node.position - origin, index, index);
        let radius = delta.length();
        let k = (ring - radius) * strength * alpha / radius;
        node.velocity += delta * k;
    }
}

/// Candidate pairs whose collision circles might touch, found by walking the
/// tree against itself and pruning cell pairs farther apart than their
/// largest radii allow.
pub(super) fn collect_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    pairs: &mut Vec<(usize, usize)>,
) {
    let reach = node_a.max_radius + node_b.max_radius;
    if node_a.bounds.distance_sq_to(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for i in 0..node_a.indices.len() {
                for j in (i + 1)..node_a.indices.len() {
                    pairs.push((node_a.indices[i], node_a.indices[j]));
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    pairs.push((from, to));
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            collect_collision_pairs(child_a, child_a, true, pairs);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                collect_collision_pairs(child_a, child_b, false, pairs);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            collect_collision_pairs(child, node_b, false, pairs);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            collect_collision_pairs(node_a, child, false, pairs);
        }
    }
}

/// Separates overlapping circles on predicted positions. The lighter (smaller)
/// node takes the larger share of the push.
pub(super) fn resolve_collision(nodes: &mut [SimNode], a: usize, b: usize, strength: f32) {
    let radius_a = nodes[a].collide_radius;
    let radius_b = nodes[b].collide_radius;
    let reach = radius_a + radius_b;

    let predicted_a = nodes[a].position + nodes[a].velocity;
    let predicted_b = nodes[b].position + nodes[b].velocity;
    let delta = predicted_a - predicted_b;
    if delta.length_sq() >= reach * reach {
        return;
    }

    let delta = nonzero(delta, a, b);
    let distance = delta.length();
    let push = delta * ((reach - distance) / distance * strength);

    let weight_a = (radius_b * radius_b) / (radius_a * radius_a + radius_b * radius_b);
    nodes[a].velocity += push * weight_a;
    nodes[b].velocity -= push * (1.0 - weight_a);
}

/// Velocity nudges toward cohort centroids. A member of several cohorts is
/// pulled toward the mean of their centroids; cohorts with a single positioned
/// member exert no pull and the ego is never clustered.
pub fn cohort_cluster_deltas(
    positions: &[Vec2],
    memberships: &[Vec<usize>],
    is_ego: &[bool],
    cohort_count: usize,
    strength: f32,
    alpha: f32,
) -> Vec<Vec2> {
    let mut sums = vec![Vec2::ZERO; cohort_count];
    let mut counts = vec![0usize; cohort_count];

    for (index, cohorts) in memberships.iter().enumerate() {
        if is_ego.get(index).copied().unwrap_or(false) {
            continue;
        }
        for &cohort in cohorts {
            if cohort < cohort_count {
                sums[cohort] += positions[index];
                counts[cohort] += 1;
            }
        }
    }

    let centroids = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &count)| if count > 0 { *sum / count as f32 } else { Vec2::ZERO })
        .collect::<Vec<_>>();

    let mut deltas = vec![Vec2::ZERO; positions.len()];
    for (index, cohorts) in memberships.iter().enumerate() {
        if is_ego.get(index).copied().unwrap_or(false) {
            continue;
        }

        let mut target = Vec2::ZERO;
        let mut pulling = 0usize;
        for &cohort in cohorts {
            if cohort < cohort_count && counts[cohort] > 1 {
                target += centroids[cohort];
                pulling += 1;
            }
        }
        if pulling == 0 {
            continue;
        }

        target /= pulling as f32;
        deltas[index] = (target - positions[index]) * strength * alpha;
    }
    deltas
}
