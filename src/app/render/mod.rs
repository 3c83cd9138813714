mod surface;

use eframe::egui::{Color32, Rect, Stroke, vec2};

use super::highlight::{HighlightState, build_highlight_state};
use super::interaction::Selection;
use super::physics::{SimNode, Simulation};
use super::render_utils::{
    ViewTransform, bounds_of, brighten, circle_visible, edge_visible, parse_hex_color, with_alpha,
};
use super::settings::VisualSettings;
use crate::social::{RelationshipCategory, SocialGraph};
pub use surface::{PainterSurface, Surface};

/// Everything a frame depends on besides the style.
pub struct FrameInput<'a> {
    pub simulation: &'a Simulation,
    pub graph: &'a SocialGraph,
    pub selection: &'a Selection,
    pub hovered: Option<usize>,
    pub active_cohort: Option<&'a str>,
    pub transform: ViewTransform,
    /// Seconds on the same clock as node `added_at` stamps.
    pub now: f64,
}

/// [`VisualSettings`] with colors parsed, resolved once per frame.
pub struct RenderStyle<'a> {
    pub settings: &'a VisualSettings,
    pub background: Color32,
    pub node_default: Color32,
    pub node_border: Color32,
    pub label: Color32,
    pub label_outline: Color32,
    edge_default: Color32,
    edge_romantic: Color32,
    edge_family: Color32,
    edge_professional: Color32,
}

impl<'a> RenderStyle<'a> {
    pub fn resolve(settings: &'a VisualSettings) -> Self {
        let fallback = VisualSettings::default();
        let color = |value: &str, default: &str| {
            parse_hex_color(value)
                .or_else(|| parse_hex_color(default))
                .unwrap_or(Color32::GRAY)
        };

        Self {
            settings,
            background: color(&settings.canvas_bg_color, &fallback.canvas_bg_color),
            node_default: color(&settings.default_node_color, &fallback.default_node_color),
            node_border: color(&settings.node_border_color, &fallback.node_border_color),
            label: color(&settings.label_color, &fallback.label_color),
            label_outline: color(&settings.label_outline_color, &fallback.label_outline_color),
            edge_default: color(&settings.edge_color_default, &fallback.edge_color_default),
            edge_romantic: color(&settings.edge_color_romantic, &fallback.edge_color_romantic),
            edge_family: color(&settings.edge_color_family, &fallback.edge_color_family),
            edge_professional: color(
                &settings.edge_color_professional,
                &fallback.edge_color_professional,
            ),
        }
    }

    pub fn edge_color(&self, category: RelationshipCategory) -> Color32 {
        match category {
            RelationshipCategory::Default => self.edge_default,
            RelationshipCategory::Romantic => self.edge_romantic,
            RelationshipCategory::Family => self.edge_family,
            RelationshipCategory::Professional => self.edge_professional,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub nodes: usize,
    pub edges: usize,
    pub labels: usize,
    pub boundaries: usize,
}

/// Draws one full frame. Reads the simulation, never changes it.
pub fn render(surface: &mut dyn Surface, input: &FrameInput<'_>, style: &RenderStyle<'_>) -> FrameStats {
    let settings = style.settings;
    let mut stats = FrameStats::default();

    surface.clear(style.background);
    surface.push_transform(input.transform);

    let view = input
        .transform
        .visible_world_rect(surface.size(), settings.view_padding);
    let highlight = input
        .hovered
        .and_then(|index| build_highlight_state(input.simulation, index));
    let cohort_colors = input
        .graph
        .cohorts
        .iter()
        .map(|cohort| parse_hex_color(&cohort.color).unwrap_or(style.node_default))
        .collect::<Vec<_>>();

    if settings.show_cohort_boundaries {
        stats.boundaries = draw_cohort_boundaries(surface, input, style, view, &cohort_colors, highlight.as_ref());
    }
    stats.edges = draw_edges(surface, input, style, view, highlight.as_ref());

    let mut drawn = Vec::with_capacity(input.simulation.nodes().len());
    for (index, node) in input.simulation.nodes().iter().enumerate() {
        let reach = node.radius + settings.selected_glow_offset.max(settings.hover_expand);
        if !circle_visible(view, node.position.to_pos2(), reach) {
            continue;
        }
        let radius = draw_node(surface, input, style, index, node, &cohort_colors, highlight.as_ref());
        drawn.push((index, radius));
    }
    stats.nodes = drawn.len();

    if settings.show_labels {
        stats.labels = draw_labels(surface, input, style, &drawn, highlight.as_ref());
    }

    surface.pop_transform();
    stats
}

fn fade_factor(node: &SimNode, now: f64, duration: f64) -> f32 {
    match node.added_at {
        Some(added_at) if duration > 0.0 => ((now - added_at) / duration).clamp(0.0, 1.0) as f32,
        _ => 1.0,
    }
}

fn draw_cohort_boundaries(
    surface: &mut dyn Surface,
    input: &FrameInput<'_>,
    style: &RenderStyle<'_>,
    view: Rect,
    cohort_colors: &[Color32],
    highlight: Option<&HighlightState>,
) -> usize {
    let settings = style.settings;
    let nodes = input.simulation.nodes();
    let mut drawn = 0;

    for (cohort, &color) in cohort_colors.iter().enumerate() {
        let members = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_ego && node.cohorts.contains(&cohort));
        let mut any_highlighted = false;
        let bounds = bounds_of(members.map(|(index, node)| {
            any_highlighted |= highlight.is_some_and(|state| state.contains_node(index));
            node.position.to_pos2()
        }));
        let Some(bounds) = bounds else {
            continue;
        };

        let rect = bounds.expand(settings.cohort_boundary_padding);
        if !view.intersects(rect) {
            continue;
        }

        let emphasis = if highlight.is_some() && !any_highlighted {
            settings.dimmed_alpha
        } else {
            1.0
        };
        let fill = with_alpha(color, settings.cohort_boundary_fill_opacity * emphasis);
        let border = Stroke::new(
            settings.cohort_boundary_border_width,
            with_alpha(color, settings.cohort_boundary_border_opacity * emphasis),
        );
        surface.rounded_rect(rect, settings.cohort_boundary_corner, fill, border);
        drawn += 1;
    }
    drawn
}

fn draw_edges(
    surface: &mut dyn Surface,
    input: &FrameInput<'_>,
    style: &RenderStyle<'_>,
    view: Rect,
    highlight: Option<&HighlightState>,
) -> usize {
    let settings = style.settings;
    let nodes = input.simulation.nodes();
    let ego = input.simulation.ego_index();
    let mut drawn = 0;

    for (index, link) in input.simulation.links().iter().enumerate() {
        let (Some(source), Some(target)) = (nodes.get(link.source), nodes.get(link.target)) else {
            continue;
        };
        let start = source.position.to_pos2();
        let end = target.position.to_pos2();
        if !edge_visible(view, start, end) {
            continue;
        }

        let selected = input.selection.relationship.as_deref() == Some(link.relationship_id.as_str());
        let highlighted = highlight.is_some_and(|state| state.contains_link(index));
        let touches_ego = ego.is_some_and(|ego| link.touches(ego));
        if touches_ego && settings.hide_ego_edges && !highlighted && !selected {
            continue;
        }

        let bond = link.kind.bond();
        let base_width = if settings.bond_to_thickness {
            let t = f32::from(bond.get() - 1) / 4.0;
            settings.edge_width_min + t * (settings.edge_width_max - settings.edge_width_min)
        } else {
            settings.edge_width
        };

        let (width, mut opacity) = if selected {
            (settings.edge_width_max, 1.0)
        } else if highlighted {
            (base_width * settings.hover_edge_boost, 1.0)
        } else if highlight.is_some() {
            (base_width, settings.dimmed_alpha)
        } else {
            (base_width, settings.bond_opacity[bond.table_index()])
        };
        if touches_ego && settings.hide_ego_edges && !selected {
            opacity *= settings.ego_edge_opacity;
        }
        let fade = fade_factor(source, input.now, settings.fade_duration_secs)
            .min(fade_factor(target, input.now, settings.fade_duration_secs));

        let color = with_alpha(style.edge_color(link.kind.category()), opacity * fade);
        surface.line_segment(start, end, Stroke::new(width, color));
        drawn += 1;
    }
    drawn
}

/// Returns the radius the node was drawn with.
fn draw_node(
    surface: &mut dyn Surface,
    input: &FrameInput<'_>,
    style: &RenderStyle<'_>,
    index: usize,
    node: &SimNode,
    cohort_colors: &[Color32],
    highlight: Option<&HighlightState>,
) -> f32 {
    let settings = style.settings;
    let center = node.position.to_pos2();
    let hovered = input.hovered == Some(index);
    let selected = input.selection.node.as_deref() == Some(node.id.as_str());

    let base = node
        .cohorts
        .first()
        .and_then(|&cohort| cohort_colors.get(cohort).copied())
        .unwrap_or(style.node_default);
    let mut alpha = fade_factor(node, input.now, settings.fade_duration_secs);
    if highlight.is_some_and(|state| !state.contains_node(index)) {
        alpha *= settings.dimmed_node_alpha;
    }

    if let Some(active) = input.active_cohort
        && let Some(cohort) = input.graph.cohorts.iter().position(|c| c.id == active)
        && node.cohorts.contains(&cohort)
    {
        let ring_color = cohort_colors.get(cohort).copied().unwrap_or(base);
        surface.circle_stroke(
            center,
            node.radius + settings.cohort_ring_offset,
            Stroke::new(settings.cohort_ring_width, with_alpha(ring_color, alpha)),
        );
    }

    if selected {
        surface.circle_filled(
            center,
            node.radius + settings.selected_glow_offset,
            with_alpha(base, settings.selected_glow_opacity * alpha),
        );
    }

    let (radius, fill) = if hovered {
        (node.radius + settings.hover_expand, brighten(base))
    } else {
        (node.radius, base)
    };
    surface.circle_filled(center, radius, with_alpha(fill, alpha));

    if settings.node_border_width > 0.0 {
        surface.circle_stroke(
            center,
            radius,
            Stroke::new(settings.node_border_width, with_alpha(style.node_border, alpha)),
        );
    }
    radius
}

fn draw_labels(
    surface: &mut dyn Surface,
    input: &FrameInput<'_>,
    style: &RenderStyle<'_>,
    drawn: &[(usize, f32)],
    highlight: Option<&HighlightState>,
) -> usize {
    let settings = style.settings;
    let zoomed_in = input.transform.k >= settings.label_min_zoom;
    let nodes = input.simulation.nodes();
    let mut labels = 0;

    for &(index, radius) in drawn {
        let highlighted = highlight.is_some_and(|state| state.contains_node(index));
        if !zoomed_in && !highlighted {
            continue;
        }
        let node = &nodes[index];
        let Some(person) = input.graph.person(&node.id) else {
            continue;
        };

        let mut alpha = fade_factor(node, input.now, settings.fade_duration_secs);
        if highlight.is_some() && !highlighted {
            alpha *= settings.dimmed_node_alpha;
        }
        let anchor = node.position.to_pos2() + vec2(0.0, radius + settings.label_offset);
        let outline = settings
            .label_outline
            .then(|| with_alpha(style.label_outline, alpha));
        surface.text(
            anchor,
            &person.name,
            settings.label_size,
            with_alpha(style.label, alpha),
            outline,
        );
        labels += 1;
    }
    labels
}
