use eframe::egui::{Pos2, Vec2};

use super::hit_test::{EDGE_HIT_THRESHOLD, HitTester};
use super::physics::Simulation;
use super::render_utils::{ViewTransform, screen_to_world};

/// Pointer travel, in screen pixels, before a press on a node becomes a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Selected person and relationship ids. At most one of the two is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub node: Option<String>,
    pub relationship: Option<String>,
}

impl Selection {
    pub fn select_node(&mut self, id: impl Into<String>) {
        self.node = Some(id.into());
        self.relationship = None;
    }

    pub fn select_relationship(&mut self, id: impl Into<String>) {
        self.node = None;
        self.relationship = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.node = None;
        self.relationship = None;
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none() && self.relationship.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    DragPending {
        node: usize,
        start: Pos2,
    },
    Dragging {
        node: usize,
    },
    /// Press on empty canvas. Stays a click until it travels past the drag
    /// threshold.
    Panning {
        start: Pos2,
        last: Pos2,
        moved: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub redraw: bool,
    pub selection_changed: bool,
}

impl Outcome {
    const REDRAW: Self = Self {
        redraw: true,
        selection_changed: false,
    };

    pub fn merge(self, other: Self) -> Self {
        Self {
            redraw: self.redraw || other.redraw,
            selection_changed: self.selection_changed || other.selection_changed,
        }
    }
}

/// What pointer events act on. Screen positions are canvas-local.
pub struct InteractionTargets<'a> {
    pub simulation: &'a mut Simulation,
    pub hits: &'a mut HitTester,
    pub selection: &'a mut Selection,
    pub transform: &'a mut ViewTransform,
}

impl InteractionTargets<'_> {
    fn world(&self, screen: Pos2) -> Vec2 {
        screen_to_world(*self.transform, screen).to_vec2()
    }
}

#[derive(Debug)]
pub struct Interaction {
    gesture: Gesture,
    hovered: Option<usize>,
    edge_threshold: f32,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            hovered: None,
            edge_threshold: EDGE_HIT_THRESHOLD,
        }
    }
}

impl Interaction {
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn set_edge_threshold(&mut self, threshold: f32) {
        self.edge_threshold = threshold;
    }

    /// Forgets node indices after the simulation was rebuilt.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.hovered = None;
    }

    /// Ends the current gesture before `simulation` is resynced. A node being
    /// dragged is released as if the pointer went up.
    pub fn cancel(&mut self, simulation: &mut Simulation) {
        if let Gesture::Dragging { node } = self.gesture {
            simulation.unpin(node);
            simulation.set_alpha_target(0.0);
            tracing::debug!(node, "drag cancelled");
        }
        self.reset();
    }

    pub fn pointer_down(&mut self, targets: &mut InteractionTargets<'_>, screen: Pos2) -> Outcome {
        let world = targets.world(screen);
        self.gesture = match targets.hits.pick_node(targets.simulation, world) {
            Some(node) => Gesture::DragPending {
                node,
                start: screen,
            },
            None => Gesture::Panning {
                start: screen,
                last: screen,
                moved: false,
            },
        };
        Outcome::default()
    }

    pub fn pointer_move(&mut self, targets: &mut InteractionTargets<'_>, screen: Pos2) -> Outcome {
        match self.gesture {
            Gesture::Idle => self.hover(targets, Some(screen)),
            Gesture::DragPending { node, start } => {
                if start.distance(screen) <= DRAG_THRESHOLD {
                    return Outcome::default();
                }

                let world = targets.world(screen);
                let drag_alpha = targets.simulation.settings().drag_alpha_target;
                targets.simulation.pin(node, world);
                targets.simulation.set_alpha_target(drag_alpha);
                targets.simulation.restart();
                self.gesture = Gesture::Dragging { node };
                tracing::debug!(node, "drag started");
                Outcome::REDRAW
            }
            Gesture::Dragging { node } => {
                let world = targets.world(screen);
                targets.simulation.pin(node, world);
                Outcome::REDRAW
            }
            Gesture::Panning { start, last, moved } => {
                let now_moving = moved || start.distance(screen) > DRAG_THRESHOLD;
                if now_moving {
                    // Travel below the threshold is applied once the pan starts.
                    let from = if moved { last } else { start };
                    targets.transform.pan_by(screen - from);
                }
                self.gesture = Gesture::Panning {
                    start,
                    last: screen,
                    moved: now_moving,
                };
                Outcome {
                    redraw: now_moving,
                    selection_changed: false,
                }
            }
        }
    }

    pub fn pointer_up(&mut self, targets: &mut InteractionTargets<'_>, screen: Pos2) -> Outcome {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle | Gesture::Panning { moved: true, .. } => Outcome::default(),
            Gesture::DragPending { .. } | Gesture::Panning { moved: false, .. } => {
                self.click(targets, screen)
            }
            Gesture::Dragging { node } => {
                targets.simulation.unpin(node);
                targets.simulation.set_alpha_target(0.0);
                tracing::debug!(node, "drag released");
                Outcome::REDRAW
            }
        }
    }

    /// Pointer moved with no button held, or left the canvas (`None`).
    pub fn hover(&mut self, targets: &mut InteractionTargets<'_>, screen: Option<Pos2>) -> Outcome {
        let hovered = match screen {
            Some(screen) => {
                let world = targets.world(screen);
                targets.hits.pick_node(targets.simulation, world)
            }
            None => None,
        };
        if hovered == self.hovered {
            return Outcome::default();
        }

        self.hovered = hovered;
        Outcome::REDRAW
    }

    pub fn escape(&mut self, selection: &mut Selection) -> Outcome {
        if selection.is_empty() {
            return Outcome::default();
        }
        selection.clear();
        tracing::debug!("selection cleared");
        Outcome {
            redraw: true,
            selection_changed: true,
        }
    }

    fn click(&mut self, targets: &mut InteractionTargets<'_>, screen: Pos2) -> Outcome {
        let world = targets.world(screen);
        let before = targets.selection.clone();

        if let Some(node) = targets.hits.pick_node(targets.simulation, world) {
            if let Some(id) = targets.simulation.node(node).map(|node| node.id.clone()) {
                targets.selection.select_node(id);
            }
        } else if let Some(link) = targets
            .hits
            .pick_edge(targets.simulation, world, self.edge_threshold)
        {
            let id = targets.simulation.links()[link].relationship_id.clone();
            targets.selection.select_relationship(id);
        } else {
            targets.selection.clear();
        }

        let changed = *targets.selection != before;
        if changed {
            tracing::debug!(
                node = ?targets.selection.node,
                relationship = ?targets.selection.relationship,
                "selection changed"
            );
        }
        Outcome {
            redraw: changed,
            selection_changed: changed,
        }
    }
}
