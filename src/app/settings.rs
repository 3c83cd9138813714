use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::social::BondStrength;

/// Tunables for the force simulation. Bond tables are ordered from
/// inseparable (bond 5) to distant (bond 1).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub bond_distance: [f32; 5],
    pub bond_link_strength: [f32; 5],
    pub bond_radial: [f32; 5],
    pub unconnected_ring: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub velocity_decay: f32,
    pub reheat_alpha: f32,
    pub center_strength: f32,
    pub charge_distance_max: f32,
    pub charge_theta: f32,
    pub collision_padding: f32,
    pub collide_strength: f32,
    pub collide_iterations: usize,
    pub radial_strength_node: f32,
    pub radial_strength_ego: f32,
    pub cluster_strength: f32,
    pub warmup_ticks: usize,
    pub warmup_cluster_strength: f32,
    pub warmup_radial_strength: f32,
    pub settle_alpha: f32,
    pub drag_alpha_target: f32,
    pub min_node_radius: f32,
    pub max_node_radius: f32,
    pub node_radius: f32,
    pub ego_radius: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            bond_distance: [60.0, 100.0, 160.0, 220.0, 300.0],
            bond_link_strength: [0.85, 0.6, 0.4, 0.2, 0.1],
            bond_radial: [100.0, 180.0, 280.0, 380.0, 500.0],
            unconnected_ring: 350.0,
            alpha_decay: 0.012,
            alpha_min: 0.001,
            velocity_decay: 0.35,
            reheat_alpha: 0.3,
            center_strength: 0.05,
            charge_distance_max: 500.0,
            charge_theta: 0.9,
            collision_padding: 10.0,
            collide_strength: 0.8,
            collide_iterations: 2,
            radial_strength_node: 0.15,
            radial_strength_ego: 1.0,
            cluster_strength: 0.1,
            warmup_ticks: 80,
            warmup_cluster_strength: 0.3,
            warmup_radial_strength: 0.4,
            settle_alpha: 0.3,
            drag_alpha_target: 0.3,
            min_node_radius: 7.0,
            max_node_radius: 18.0,
            node_radius: 12.0,
            ego_radius: 20.0,
        }
    }
}

impl PhysicsSettings {
    pub fn link_distance(&self, bond: BondStrength) -> f32 {
        self.bond_distance[bond.table_index()]
    }

    pub fn link_strength(&self, bond: BondStrength) -> f32 {
        self.bond_link_strength[bond.table_index()]
    }

    pub fn ring(&self, bond: Option<BondStrength>) -> f32 {
        bond.map_or(self.unconnected_ring, |bond| self.bond_radial[bond.table_index()])
    }

    /// Square-root degree scaling between the min and max radius. The ego keeps
    /// its own radius so its usually larger degree does not flatten the rest.
    pub fn visual_radius(&self, degree: usize, max_degree: usize, is_ego: bool) -> f32 {
        if is_ego {
            return self.ego_radius;
        }
        if max_degree <= 1 {
            return self.node_radius;
        }

        let normalized = ((degree as f32).sqrt() / (max_degree as f32).sqrt()).clamp(0.0, 1.0);
        self.min_node_radius + normalized * (self.max_node_radius - self.min_node_radius)
    }

    pub fn collide_radius(&self, visual_radius: f32, degree: usize) -> f32 {
        visual_radius + self.collision_padding + (degree as f32 * 1.5).min(12.0)
    }
}

/// Everything the renderer and hit-tester read. Colors are `#RRGGBB` strings
/// and are parsed once per frame. Node radii live in [`PhysicsSettings`] since
/// the simulation, renderer and hit-tester must agree on them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    pub default_node_color: String,
    pub node_border_width: f32,
    pub node_border_color: String,
    pub hover_expand: f32,
    pub selected_glow_offset: f32,
    pub selected_glow_opacity: f32,
    pub cohort_ring_offset: f32,
    pub cohort_ring_width: f32,

    pub bond_to_thickness: bool,
    pub edge_width: f32,
    pub edge_width_min: f32,
    pub edge_width_max: f32,
    pub hover_edge_boost: f32,
    pub edge_color_default: String,
    pub edge_color_romantic: String,
    pub edge_color_family: String,
    pub edge_color_professional: String,
    pub bond_opacity: [f32; 5],
    pub dimmed_alpha: f32,
    pub dimmed_node_alpha: f32,
    pub hide_ego_edges: bool,
    pub ego_edge_opacity: f32,

    pub label_color: String,
    pub label_size: f32,
    pub label_offset: f32,
    pub show_labels: bool,
    pub label_outline: bool,
    pub label_outline_color: String,
    pub label_min_zoom: f32,

    pub show_cohort_boundaries: bool,
    pub cohort_boundary_padding: f32,
    pub cohort_boundary_corner: f32,
    pub cohort_boundary_fill_opacity: f32,
    pub cohort_boundary_border_opacity: f32,
    pub cohort_boundary_border_width: f32,

    pub canvas_bg_color: String,
    pub view_padding: f32,
    pub fade_duration_secs: f64,
    pub edge_hit_threshold: f32,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            default_node_color: "#6B7280".to_owned(),
            node_border_width: 0.0,
            node_border_color: "#FFFFFF".to_owned(),
            hover_expand: 3.0,
            selected_glow_offset: 6.0,
            selected_glow_opacity: 0.25,
            cohort_ring_offset: 4.0,
            cohort_ring_width: 2.0,

            bond_to_thickness: false,
            edge_width: 1.0,
            edge_width_min: 0.5,
            edge_width_max: 4.0,
            hover_edge_boost: 1.8,
            edge_color_default: "#999999".to_owned(),
            edge_color_romantic: "#FF69B4".to_owned(),
            edge_color_family: "#FFD700".to_owned(),
            edge_color_professional: "#4A90D9".to_owned(),
            bond_opacity: [0.9, 0.7, 0.5, 0.3, 0.2],
            dimmed_alpha: 0.04,
            dimmed_node_alpha: 0.25,
            hide_ego_edges: true,
            ego_edge_opacity: 0.5,

            label_color: "#D1D5DB".to_owned(),
            label_size: 11.0,
            label_offset: 4.0,
            show_labels: true,
            label_outline: true,
            label_outline_color: "#09090B".to_owned(),
            label_min_zoom: 0.6,

            show_cohort_boundaries: true,
            cohort_boundary_padding: 28.0,
            cohort_boundary_corner: 18.0,
            cohort_boundary_fill_opacity: 0.07,
            cohort_boundary_border_opacity: 0.35,
            cohort_boundary_border_width: 1.5,

            canvas_bg_color: "#09090B".to_owned(),
            view_padding: 50.0,
            fade_duration_secs: 0.3,
            edge_hit_threshold: 8.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    pub visual: VisualSettings,
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid settings JSON")
    }

    /// Reads overrides from `path`. Anything missing keeps its default; a
    /// file that cannot be read or parsed falls back to defaults entirely.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        let loaded = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))
            .and_then(|raw| Self::from_json(&raw));

        match loaded {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings overrides");
                settings
            }
            Err(error) => {
                tracing::warn!("{error:#}; using default settings");
                Self::default()
            }
        }
    }
}
