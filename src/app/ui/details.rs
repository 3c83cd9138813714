use eframe::egui::{self, RichText, Ui};

use crate::social::{Person, Relationship, RelationshipType, SocialGraph};

use super::super::ViewModel;

#[derive(Clone, Debug, PartialEq)]
struct ConnectionEntry {
    relationship_id: String,
    person_id: String,
    name: String,
    kind: RelationshipType,
}

/// Everyone linked to `person_id`, strongest bond first.
fn connections_of(graph: &SocialGraph, person_id: &str) -> Vec<ConnectionEntry> {
    let mut connections = graph
        .relationships
        .iter()
        .filter_map(|relationship| {
            let other = relationship.other_end(person_id)?;
            let person = graph.person(other)?;
            Some(ConnectionEntry {
                relationship_id: relationship.id.clone(),
                person_id: person.id.clone(),
                name: person.name.clone(),
                kind: relationship.kind,
            })
        })
        .collect::<Vec<_>>();

    connections.sort_by(|a, b| {
        b.kind
            .bond()
            .cmp(&a.kind.bond())
            .then_with(|| a.name.cmp(&b.name))
    });
    connections
}

/// Text being edited in the details panel, reloaded whenever the panel
/// switches to another person or relationship.
#[derive(Debug, Default)]
pub(in crate::app) struct DetailDrafts {
    owner: Option<String>,
    name: String,
    label: String,
    notes: String,
}

impl DetailDrafts {
    fn load(&mut self, owner: &str, name: &str, label: Option<&str>, notes: Option<&str>) {
        if self.owner.as_deref() == Some(owner) {
            return;
        }
        self.owner = Some(owner.to_owned());
        self.name = name.to_owned();
        self.label = label.unwrap_or_default().to_owned();
        self.notes = notes.unwrap_or_default().to_owned();
    }
}

fn draft_changed(draft: &str, saved: Option<&str>) -> bool {
    draft.trim() != saved.unwrap_or_default()
}

fn kind_picker(ui: &mut Ui, id_salt: &str, kind: &mut RelationshipType) -> bool {
    let before = *kind;
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(kind.label())
        .show_ui(ui, |ui| {
            for option in RelationshipType::ALL {
                ui.selectable_value(kind, option, option.label());
            }
        });
    *kind != before
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        if let Some(id) = self.selection.node.clone() {
            match self.graph.person(&id).cloned() {
                Some(person) => self.draw_person_details(ui, &person),
                None => {
                    ui.label("Selected person no longer exists.");
                }
            }
        } else if let Some(id) = self.selection.relationship.clone() {
            match self.graph.relationship(&id).cloned() {
                Some(relationship) => self.draw_relationship_details(ui, &relationship),
                None => {
                    ui.label("Selected relationship no longer exists.");
                }
            }
        } else {
            ui.label("Click a person or a relationship on the canvas.");
            ui.add_space(4.0);
            ui.small("Drag people to move them, drag the background to pan, scroll to zoom.");
        }
    }

    fn draw_person_details(&mut self, ui: &mut Ui, person: &Person) {
        let now = ui.input(|input| input.time);

        self.drafts
            .load(&person.id, &person.name, None, person.notes.as_deref());

        ui.label(RichText::new(person.name.as_str()).strong());
        if person.is_ego {
            ui.small("This is you.");
        } else {
            let bond = self.graph.best_bond_to_ego().get(&person.id).copied();
            ui.small(match bond {
                Some(bond) => format!("Bond with me: {} ({})", bond.label(), bond.get()),
                None => "Not connected to me".to_owned(),
            });
        }
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.drafts.name);
            let name = self.drafts.name.trim().to_owned();
            if ui
                .add_enabled(
                    !name.is_empty() && name != person.name,
                    egui::Button::new("Rename"),
                )
                .clicked()
            {
                self.apply_edit(now, |graph| graph.rename_person(&person.id, name));
            }
        });

        ui.add(
            egui::TextEdit::multiline(&mut self.drafts.notes)
                .desired_rows(3)
                .hint_text("Notes"),
        );
        if ui
            .add_enabled(
                draft_changed(&self.drafts.notes, person.notes.as_deref()),
                egui::Button::new("Save notes"),
            )
            .clicked()
        {
            let notes = Some(self.drafts.notes.clone());
            self.apply_edit(now, |graph| graph.set_person_notes(&person.id, notes));
        }

        if !self.graph.cohorts.is_empty() {
            ui.separator();
            ui.label(RichText::new("Cohorts").strong());
            let mut memberships = person.cohort_ids.clone();
            let mut changed = false;
            for cohort in &self.graph.cohorts {
                let mut member = memberships.contains(&cohort.id);
                if ui.checkbox(&mut member, cohort.name.as_str()).changed() {
                    changed = true;
                    if member {
                        memberships.push(cohort.id.clone());
                    } else {
                        memberships.retain(|id| id != &cohort.id);
                    }
                }
            }
            if changed {
                self.apply_edit(now, |graph| graph.set_person_cohorts(&person.id, memberships));
            }
        }

        ui.separator();
        let connections = connections_of(&self.graph, &person.id);
        ui.label(RichText::new(format!("Connections ({})", connections.len())).strong());
        if connections.is_empty() {
            ui.label("No relationships yet.");
        }
        for connection in &connections {
            ui.horizontal(|ui| {
                if ui.link(connection.name.as_str()).clicked() {
                    self.set_selected_person(Some(connection.person_id.clone()));
                }
                if ui
                    .small_button(connection.kind.label())
                    .on_hover_text("Show this relationship")
                    .clicked()
                {
                    self.selection
                        .select_relationship(connection.relationship_id.clone());
                }
            });
        }

        ui.separator();
        ui.label(RichText::new("Connect to").strong());
        let target_label = self
            .link_target
            .as_deref()
            .and_then(|id| self.graph.person(id))
            .map_or("Choose someone".to_owned(), |target| target.name.clone());
        egui::ComboBox::from_id_salt("link_target")
            .selected_text(target_label)
            .show_ui(ui, |ui| {
                for other in self.graph.persons.iter().filter(|other| other.id != person.id) {
                    ui.selectable_value(
                        &mut self.link_target,
                        Some(other.id.clone()),
                        other.name.as_str(),
                    );
                }
            });
        kind_picker(ui, "link_kind", &mut self.link_kind);

        let target = self.link_target.clone();
        if ui
            .add_enabled(target.is_some(), egui::Button::new("Add relationship"))
            .clicked()
            && let Some(target) = target
        {
            let kind = self.link_kind;
            if let Some(id) =
                self.apply_edit(now, |graph| graph.add_relationship(&person.id, &target, kind))
            {
                tracing::debug!(relationship = %id, "relationship added");
                self.link_target = None;
            }
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Center view").clicked() {
                self.center_view_on(&person.id);
            }
            let remove = ui
                .add_enabled(!person.is_ego, egui::Button::new("Remove person"))
                .on_disabled_hover_text("You cannot remove yourself from your own graph.");
            if remove.clicked() {
                self.apply_edit(now, |graph| graph.remove_person(&person.id));
            }
        });
    }

    fn draw_relationship_details(&mut self, ui: &mut Ui, relationship: &Relationship) {
        let now = ui.input(|input| input.time);
        let name_of = |id: &str| {
            self.graph
                .person(id)
                .map_or_else(|| id.to_owned(), |person| person.name.clone())
        };
        let source_name = name_of(&relationship.source_id);
        let target_name = name_of(&relationship.target_id);

        self.drafts.load(
            &relationship.id,
            "",
            relationship.label.as_deref(),
            relationship.notes.as_deref(),
        );

        ui.label(RichText::new(format!("{source_name} and {target_name}")).strong());
        let bond = relationship.bond();
        ui.small(format!(
            "{} · bond {} ({})",
            relationship.category().label(),
            bond.label(),
            bond.get()
        ));
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui.link(source_name.as_str()).clicked() {
                self.set_selected_person(Some(relationship.source_id.clone()));
            }
            ui.label("·");
            if ui.link(target_name.as_str()).clicked() {
                self.set_selected_person(Some(relationship.target_id.clone()));
            }
        });

        ui.separator();
        let mut kind = relationship.kind;
        ui.horizontal(|ui| {
            ui.label("Type");
            if kind_picker(ui, "relationship_kind", &mut kind) {
                self.apply_edit(now, |graph| {
                    graph.update_relationship_kind(&relationship.id, kind)
                });
            }
        });

        ui.separator();
        ui.add(egui::TextEdit::singleline(&mut self.drafts.label).hint_text("Label"));
        ui.add(
            egui::TextEdit::multiline(&mut self.drafts.notes)
                .desired_rows(3)
                .hint_text("Notes"),
        );
        let edited = draft_changed(&self.drafts.label, relationship.label.as_deref())
            || draft_changed(&self.drafts.notes, relationship.notes.as_deref());
        if ui
            .add_enabled(edited, egui::Button::new("Save"))
            .clicked()
        {
            let label = Some(self.drafts.label.clone());
            let notes = Some(self.drafts.notes.clone());
            self.apply_edit(now, |graph| {
                graph.update_relationship(&relationship.id, label, notes)
            });
        }

        ui.separator();
        if ui.button("Remove relationship").clicked() {
            self.apply_edit(now, |graph| graph.remove_relationship(&relationship.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connections_are_ordered_by_bond_then_name() {
        let mut graph = SocialGraph::new("details");
        let ego = graph.ego_id().expect("ego").to_owned();
        let zed = graph.add_person("Zed", Vec::new());
        let amy = graph.add_person("Amy", Vec::new());
        let bo = graph.add_person("Bo", Vec::new());
        graph
            .add_relationship(&ego, &zed, RelationshipType::BestFriend)
            .expect("link");
        graph
            .add_relationship(&amy, &ego, RelationshipType::Acquaintance)
            .expect("link");
        graph
            .add_relationship(&ego, &bo, RelationshipType::Acquaintance)
            .expect("link");
        graph
            .add_relationship(&amy, &bo, RelationshipType::Friend)
            .expect("link");

        let names = connections_of(&graph, &ego)
            .into_iter()
            .map(|entry| entry.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Zed", "Amy", "Bo"]);

        let amy_links = connections_of(&graph, &amy);
        assert_eq!(amy_links.len(), 2);
        assert_eq!(amy_links[0].person_id, bo);
        assert_eq!(amy_links[0].kind, RelationshipType::Friend);
    }

    #[test]
    fn drafts_reload_only_when_the_selection_changes() {
        let mut drafts = DetailDrafts::default();
        drafts.load("ana", "Ana", None, Some("likes jazz"));
        assert_eq!(drafts.name, "Ana");
        assert_eq!(drafts.notes, "likes jazz");

        drafts.notes.push_str(" and chess");
        drafts.load("ana", "Ana", None, Some("likes jazz"));
        assert_eq!(drafts.notes, "likes jazz and chess");

        drafts.load("r1", "", Some("Book club"), None);
        assert_eq!(drafts.label, "Book club");
        assert!(drafts.notes.is_empty());
    }

    #[test]
    fn draft_changes_ignore_surrounding_whitespace() {
        assert!(!draft_changed("  hello ", Some("hello")));
        assert!(!draft_changed("", None));
        assert!(draft_changed("hello", None));
        assert!(draft_changed("", Some("hello")));
    }

    #[test]
    fn dangling_relationships_are_not_listed() {
        let mut graph = SocialGraph::new("details");
        let ego = graph.ego_id().expect("ego").to_owned();
        let gone = graph.add_person("Gone", Vec::new());
        graph
            .add_relationship(&ego, &gone, RelationshipType::Friend)
            .expect("link");
        graph.persons.retain(|person| person.id != gone);

        assert!(connections_of(&graph, &ego).is_empty());
    }
}
