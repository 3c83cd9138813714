use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::graph::{Cohort, GraphMetadata, Person, Relationship, RelationshipType, SocialGraph};

pub const DEFAULT_COHORT_COLORS: [&str; 8] = [
    "#6366F1", "#EC4899", "#F59E0B", "#10B981", "#3B82F6", "#8B5CF6", "#EF4444", "#14B8A6",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("no person with id {0}")]
    UnknownPerson(String),
    #[error("no relationship with id {0}")]
    UnknownRelationship(String),
    #[error("no cohort with id {0}")]
    UnknownCohort(String),
    #[error("a relationship needs two different people (got {0} twice)")]
    SelfRelationship(String),
    #[error("the ego node cannot be removed")]
    EgoRemoval,
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl SocialGraph {
    pub fn new(title: impl Into<String>) -> Self {
        let now = timestamp();
        Self {
            persons: vec![Person {
                id: "ego".to_owned(),
                name: "Me".to_owned(),
                cohort_ids: Vec::new(),
                is_ego: true,
                notes: None,
            }],
            relationships: Vec::new(),
            cohorts: Vec::new(),
            active_cohort_id: None,
            metadata: GraphMetadata {
                title: title.into(),
                created_at: now.clone(),
                updated_at: now,
            },
        }
    }

    fn touch(&mut self) {
        self.metadata.updated_at = timestamp();
    }

    fn known_cohorts(&self, cohort_ids: Vec<String>) -> Vec<String> {
        let mut kept: Vec<String> = Vec::with_capacity(cohort_ids.len());
        for id in cohort_ids {
            if self.cohort(&id).is_some() && !kept.contains(&id) {
                kept.push(id);
            }
        }
        kept
    }

    pub fn add_person(&mut self, name: impl Into<String>, cohort_ids: Vec<String>) -> String {
        let id = new_id();
        let cohort_ids = self.known_cohorts(cohort_ids);
        self.persons.push(Person {
            id: id.clone(),
            name: name.into(),
            cohort_ids,
            is_ego: false,
            notes: None,
        });
        self.touch();
        id
    }

    pub fn rename_person(&mut self, id: &str, name: impl Into<String>) -> Result<(), GraphError> {
        let person = self
            .persons
            .iter_mut()
            .find(|person| person.id == id)
            .ok_or_else(|| GraphError::UnknownPerson(id.to_owned()))?;
        person.name = name.into();
        self.touch();
        Ok(())
    }

    pub fn set_person_cohorts(
        &mut self,
        id: &str,
        cohort_ids: Vec<String>,
    ) -> Result<(), GraphError> {
        let cohort_ids = self.known_cohorts(cohort_ids);
        let person = self
            .persons
            .iter_mut()
            .find(|person| person.id == id)
            .ok_or_else(|| GraphError::UnknownPerson(id.to_owned()))?;
        person.cohort_ids = cohort_ids;
        self.touch();
        Ok(())
    }

    /// Replaces the free-text note on a person. Blank text clears it.
    pub fn set_person_notes(&mut self, id: &str, notes: Option<String>) -> Result<(), GraphError> {
        let person = self
            .persons
            .iter_mut()
            .find(|person| person.id == id)
            .ok_or_else(|| GraphError::UnknownPerson(id.to_owned()))?;
        person.notes = non_blank(notes);
        self.touch();
        Ok(())
    }

    /// Removes a person together with every relationship that touches them.
    pub fn remove_person(&mut self, id: &str) -> Result<Person, GraphError> {
        let position = self
            .persons
            .iter()
            .position(|person| person.id == id)
            .ok_or_else(|| GraphError::UnknownPerson(id.to_owned()))?;
        if self.persons[position].is_ego {
            return Err(GraphError::EgoRemoval);
        }

        let removed = self.persons.remove(position);
        self.relationships
            .retain(|relationship| !relationship.touches(id));
        self.touch();
        Ok(removed)
    }

    /// Links two people. An existing relationship between the pair, in either
    /// direction, is reused instead of creating a second one.
    pub fn add_relationship(
        &mut self,
        source_id: &str,
        target_id: &str,
        kind: RelationshipType,
    ) -> Result<String, GraphError> {
        if source_id == target_id {
            return Err(GraphError::SelfRelationship(source_id.to_owned()));
        }
        for id in [source_id, target_id] {
            if self.person(id).is_none() {
                return Err(GraphError::UnknownPerson(id.to_owned()));
            }
        }

        if let Some(existing) = self.relationship_between(source_id, target_id) {
            return Ok(existing.id.clone());
        }

        let id = new_id();
        self.relationships.push(Relationship {
            id: id.clone(),
            source_id: source_id.to_owned(),
            target_id: target_id.to_owned(),
            kind,
            label: None,
            notes: None,
        });
        self.touch();
        Ok(id)
    }

    pub fn update_relationship_kind(
        &mut self,
        id: &str,
        kind: RelationshipType,
    ) -> Result<(), GraphError> {
        let relationship = self
            .relationships
            .iter_mut()
            .find(|relationship| relationship.id == id)
            .ok_or_else(|| GraphError::UnknownRelationship(id.to_owned()))?;
        relationship.kind = kind;
        self.touch();
        Ok(())
    }

    /// Sets the free-text label and notes of a relationship. Blank text
    /// clears a field.
    pub fn update_relationship(
        &mut self,
        id: &str,
        label: Option<String>,
        notes: Option<String>,
    ) -> Result<(), GraphError> {
        let relationship = self
            .relationships
            .iter_mut()
            .find(|relationship| relationship.id == id)
            .ok_or_else(|| GraphError::UnknownRelationship(id.to_owned()))?;
        relationship.label = non_blank(label);
        relationship.notes = non_blank(notes);
        self.touch();
        Ok(())
    }

    pub fn remove_relationship(&mut self, id: &str) -> Result<Relationship, GraphError> {
        let position = self
            .relationships
            .iter()
            .position(|relationship| relationship.id == id)
            .ok_or_else(|| GraphError::UnknownRelationship(id.to_owned()))?;
        let removed = self.relationships.remove(position);
        self.touch();
        Ok(removed)
    }

    pub fn add_cohort(&mut self, name: impl Into<String>) -> String {
        let id = new_id();
        let color = DEFAULT_COHORT_COLORS[self.cohorts.len() % DEFAULT_COHORT_COLORS.len()];
        self.cohorts.push(Cohort {
            id: id.clone(),
            name: name.into(),
            color: color.to_owned(),
        });
        self.touch();
        id
    }

    pub fn update_cohort(
        &mut self,
        id: &str,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<(), GraphError> {
        let cohort = self
            .cohorts
            .iter_mut()
            .find(|cohort| cohort.id == id)
            .ok_or_else(|| GraphError::UnknownCohort(id.to_owned()))?;
        cohort.name = name.into();
        cohort.color = color.into();
        self.touch();
        Ok(())
    }

    /// Deletes a cohort and strips it from every membership list. People and
    /// relationships are left alone.
    pub fn remove_cohort(&mut self, id: &str) -> Result<Cohort, GraphError> {
        let position = self
            .cohorts
            .iter()
            .position(|cohort| cohort.id == id)
            .ok_or_else(|| GraphError::UnknownCohort(id.to_owned()))?;
        let removed = self.cohorts.remove(position);

        for person in &mut self.persons {
            person.cohort_ids.retain(|cohort_id| cohort_id != id);
        }
        if self.active_cohort_id.as_deref() == Some(id) {
            self.active_cohort_id = None;
        }
        self.touch();
        Ok(removed)
    }

    pub fn set_active_cohort(&mut self, id: Option<String>) -> Result<(), GraphError> {
        if let Some(cohort_id) = &id
            && self.cohort(cohort_id).is_none()
        {
            return Err(GraphError::UnknownCohort(cohort_id.clone()));
        }
        self.active_cohort_id = id;
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_has_exactly_one_ego() {
        let graph = SocialGraph::new("Mine");
        assert_eq!(graph.persons.iter().filter(|p| p.is_ego).count(), 1);
        assert_eq!(graph.metadata.title, "Mine");
    }

    #[test]
    fn duplicate_relationship_in_either_order_is_ignored() {
        let mut graph = SocialGraph::new("g");
        let a = graph.add_person("Ana", Vec::new());
        let b = graph.add_person("Ben", Vec::new());

        let first = graph
            .add_relationship(&a, &b, RelationshipType::Friend)
            .expect("first link");
        let again = graph
            .add_relationship(&a, &b, RelationshipType::Friend)
            .expect("same order");
        let reversed = graph
            .add_relationship(&b, &a, RelationshipType::Colleague)
            .expect("reverse order");

        assert_eq!(first, again);
        assert_eq!(first, reversed);
        assert_eq!(graph.relationships.len(), 1);
        assert_eq!(graph.relationships[0].kind, RelationshipType::Friend);
    }

    #[test]
    fn relationship_endpoints_are_validated() {
        let mut graph = SocialGraph::new("g");
        let a = graph.add_person("Ana", Vec::new());

        assert_eq!(
            graph.add_relationship(&a, &a, RelationshipType::Friend),
            Err(GraphError::SelfRelationship(a.clone()))
        );
        assert_eq!(
            graph.add_relationship(&a, "ghost", RelationshipType::Friend),
            Err(GraphError::UnknownPerson("ghost".to_owned()))
        );
    }

    #[test]
    fn removing_person_cascades_to_relationships() {
        let mut graph = SocialGraph::new("g");
        let ego = graph.ego_id().expect("ego").to_owned();
        let cohort = graph.add_cohort("Work");
        let a = graph.add_person("Ana", vec![cohort.clone()]);
        let b = graph.add_person("Ben", vec![cohort.clone()]);
        graph
            .add_relationship(&ego, &a, RelationshipType::Friend)
            .expect("link");
        graph
            .add_relationship(&b, &a, RelationshipType::Colleague)
            .expect("link");
        graph
            .add_relationship(&ego, &b, RelationshipType::Colleague)
            .expect("link");

        graph.remove_person(&a).expect("remove");

        assert!(graph.person(&a).is_none());
        assert!(graph.relationships.iter().all(|r| !r.touches(&a)));
        assert_eq!(graph.relationships.len(), 1);
        assert_eq!(graph.members_of(&cohort).count(), 1);
    }

    #[test]
    fn ego_cannot_be_removed() {
        let mut graph = SocialGraph::new("g");
        let ego = graph.ego_id().expect("ego").to_owned();
        assert_eq!(graph.remove_person(&ego), Err(GraphError::EgoRemoval));
        assert!(graph.ego().is_some());
    }

    #[test]
    fn removing_cohort_strips_membership_only() {
        let mut graph = SocialGraph::new("g");
        let school = graph.add_cohort("School");
        let work = graph.add_cohort("Work");
        let a = graph.add_person("Ana", vec![school.clone(), work.clone()]);
        let ego = graph.ego_id().expect("ego").to_owned();
        graph
            .add_relationship(&ego, &a, RelationshipType::Classmate)
            .expect("link");
        graph.set_active_cohort(Some(school.clone())).expect("active");

        graph.remove_cohort(&school).expect("remove cohort");

        let person = graph.person(&a).expect("person kept");
        assert_eq!(person.cohort_ids, vec![work]);
        assert_eq!(graph.relationships.len(), 1);
        assert_eq!(graph.active_cohort_id, None);
    }

    #[test]
    fn cohort_colors_cycle_through_palette() {
        let mut graph = SocialGraph::new("g");
        let ids = (0..9)
            .map(|index| graph.add_cohort(format!("c{index}")))
            .collect::<Vec<_>>();
        assert_eq!(graph.cohort(&ids[0]).map(|c| c.color.as_str()), Some("#6366F1"));
        assert_eq!(graph.cohort(&ids[8]).map(|c| c.color.as_str()), Some("#6366F1"));
        assert_eq!(graph.cohort(&ids[1]).map(|c| c.color.as_str()), Some("#EC4899"));
    }

    #[test]
    fn unknown_cohorts_are_dropped_from_membership() {
        let mut graph = SocialGraph::new("g");
        let work = graph.add_cohort("Work");
        let a = graph.add_person("Ana", vec![work.clone(), "missing".to_owned(), work.clone()]);
        assert_eq!(graph.person(&a).map(|p| p.cohort_ids.clone()), Some(vec![work]));
    }

    #[test]
    fn notes_and_labels_are_trimmed_and_blank_clears() {
        let mut graph = SocialGraph::new("g");
        let ego = graph.ego_id().expect("ego").to_owned();
        let ana = graph.add_person("Ana", Vec::new());
        let link = graph
            .add_relationship(&ego, &ana, RelationshipType::Friend)
            .expect("link");
        graph.metadata.updated_at = "stale".to_owned();

        graph
            .set_person_notes(&ana, Some("  met at the climbing gym ".to_owned()))
            .expect("notes");
        assert_eq!(
            graph.person(&ana).and_then(|person| person.notes.as_deref()),
            Some("met at the climbing gym")
        );
        assert_ne!(graph.metadata.updated_at, "stale");

        graph
            .update_relationship(&link, Some("Lisbon trip".to_owned()), Some("   ".to_owned()))
            .expect("update");
        let relationship = graph.relationship(&link).expect("relationship");
        assert_eq!(relationship.label.as_deref(), Some("Lisbon trip"));
        assert_eq!(relationship.notes, None);
        assert_eq!(relationship.kind, RelationshipType::Friend);

        graph.set_person_notes(&ana, None).expect("clear");
        assert_eq!(graph.person(&ana).and_then(|person| person.notes.clone()), None);
    }

    #[test]
    fn cohorts_can_be_renamed_and_recolored() {
        let mut graph = SocialGraph::new("g");
        let band = graph.add_cohort("Band");
        graph.metadata.updated_at = "stale".to_owned();

        graph
            .update_cohort(&band, "Choir", "#112233")
            .expect("update");

        let cohort = graph.cohort(&band).expect("cohort");
        assert_eq!(cohort.name, "Choir");
        assert_eq!(cohort.color, "#112233");
        assert_ne!(graph.metadata.updated_at, "stale");
    }

    #[test]
    fn updates_reject_unknown_ids() {
        let mut graph = SocialGraph::new("g");
        let before = graph.clone();

        assert_eq!(
            graph.set_person_notes("nobody", Some("x".to_owned())),
            Err(GraphError::UnknownPerson("nobody".to_owned()))
        );
        assert_eq!(
            graph.update_relationship("r", None, None),
            Err(GraphError::UnknownRelationship("r".to_owned()))
        );
        assert_eq!(
            graph.update_cohort("c", "x", "#000000"),
            Err(GraphError::UnknownCohort("c".to_owned()))
        );
        assert_eq!(graph, before);
    }
}
