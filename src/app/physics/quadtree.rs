use eframe::egui::{Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 12;
const QUADTREE_MAX_DEPTH: usize = 10;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct QuadBounds {
    pub(in crate::app) center: Vec2,
    pub(in crate::app) half_extent: f32,
}

impl QuadBounds {
    fn from_points(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let center = (min + max) * 0.5;
        let span_x = (max.x - min.x).max(1.0);
        let span_y = (max.y - min.y).max(1.0);
        let half_extent = (span_x.max(span_y) * 0.5) + 1.0;

        Some(Self {
            center,
            half_extent,
        })
    }

    pub(in crate::app) fn contains(self, point: Vec2) -> bool {
        let min = self.center - vec2(self.half_extent, self.half_extent);
        let max = self.center + vec2(self.half_extent, self.half_extent);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => vec2(-quarter, -quarter),
            1 => vec2(quarter, -quarter),
            2 => vec2(-quarter, quarter),
            _ => vec2(quarter, quarter),
        };

        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        let right = point.x >= self.center.x;
        let lower = point.y >= self.center.y;
        match (right, lower) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    pub(in crate::app) fn side_length(self) -> f32 {
        self.half_extent * 2.0
    }

    pub(in crate::app) fn distance_sq_to(self, other: Self) -> f32 {
        let dx = (self.center.x - other.center.x).abs() - (self.half_extent + other.half_extent);
        let dy = (self.center.y - other.center.y).abs() - (self.half_extent + other.half_extent);
        let clamped_dx = dx.max(0.0);
        let clamped_dy = dy.max(0.0);
        (clamped_dx * clamped_dx) + (clamped_dy * clamped_dy)
    }

    pub(in crate::app) fn distance_sq_to_point(self, point: Vec2) -> f32 {
        let dx = ((self.center.x - point.x).abs() - self.half_extent).max(0.0);
        let dy = ((self.center.y - point.y).abs() - self.half_extent).max(0.0);
        (dx * dx) + (dy * dy)
    }
}

/// Region quadtree over node positions. Every cell carries the aggregates the
/// forces need: the strength-weighted center and total charge for many-body
/// approximation, and the largest radius inside it for collision pruning.
pub(in crate::app) struct QuadNode {
    pub(in crate::app) bounds: QuadBounds,
    pub(in crate::app) center_of_charge: Vec2,
    pub(in crate::app) charge: f32,
    pub(in crate::app) max_radius: f32,
    pub(in crate::app) indices: Vec<usize>,
    pub(in crate::app) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    /// `charges` and `radii` are indexed like `positions`.
    pub(in crate::app) fn build(positions: &[Vec2], charges: &[f32], radii: &[f32]) -> Option<Self> {
        let bounds = QuadBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, charges, radii, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Vec2],
        charges: &[f32],
        radii: &[f32],
        depth: usize,
    ) -> Self {
        let mut weighted = Vec2::ZERO;
        let mut weight = 0.0;
        let mut charge = 0.0;
        let mut max_radius = 0.0_f32;
        for &index in &indices {
            let value = charges.get(index).copied().unwrap_or(0.0);
            weighted += positions[index] * value.abs();
            weight += value.abs();
            charge += value;
            max_radius = max_radius.max(radii.get(index).copied().unwrap_or(0.0));
        }

        let center_of_charge = if weight > 0.0 {
            weighted / weight
        } else {
            bounds.center
        };

        let mut node = Self {
            bounds,
            center_of_charge,
            charge,
            max_radius,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            let quadrant = bounds.quadrant_for(positions[index]);
            buckets[quadrant].push(index);
        }

        let non_empty = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            let child_bounds = bounds.child(quadrant);
            node.children[quadrant] = Some(Box::new(Self::build_node(
                child_bounds,
                bucket,
                positions,
                charges,
                radii,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(in crate::app) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }

    /// Closest point to `query` no farther than `max_distance`, as
    /// `(index, distance)`.
    pub(in crate::app) fn nearest_within(
        &self,
        query: Vec2,
        positions: &[Vec2],
        max_distance: f32,
    ) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        let mut best_sq = max_distance * max_distance;
        self.visit_nearest(query, positions, &mut best_sq, &mut best);
        best.map(|(index, distance_sq)| (index, distance_sq.sqrt()))
    }

    fn visit_nearest(
        &self,
        query: Vec2,
        positions: &[Vec2],
        best_sq: &mut f32,
        best: &mut Option<(usize, f32)>,
    ) {
        if self.bounds.distance_sq_to_point(query) > *best_sq {
            return;
        }

        for &index in &self.indices {
            let distance_sq = (positions[index] - query).length_sq();
            if distance_sq <= *best_sq {
                *best_sq = distance_sq;
                *best = Some((index, distance_sq));
            }
        }

        // Visit the child containing the query first so the bound shrinks early.
        let first = self.bounds.quadrant_for(query);
        let order = [first, first ^ 1, first ^ 2, first ^ 3];
        for quadrant in order {
            if let Some(child) = self.children[quadrant].as_ref() {
                child.visit_nearest(query, positions, best_sq, best);
            }
        }
    }
}
