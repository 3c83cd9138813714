use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Friend,
    CloseFriend,
    BestFriend,
    ChildhoodFriend,
    Partner,
    Ex,
    Crush,
    Colleague,
    Classmate,
    Roommate,
    Family,
    Sibling,
    Acquaintance,
    Other,
}

impl RelationshipType {
    pub const ALL: [Self; 14] = [
        Self::Friend,
        Self::CloseFriend,
        Self::BestFriend,
        Self::ChildhoodFriend,
        Self::Partner,
        Self::Ex,
        Self::Crush,
        Self::Colleague,
        Self::Classmate,
        Self::Roommate,
        Self::Family,
        Self::Sibling,
        Self::Acquaintance,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Friend => "Friend",
            Self::CloseFriend => "Close friend",
            Self::BestFriend => "Best friend",
            Self::ChildhoodFriend => "Childhood friend",
            Self::Partner => "Partner",
            Self::Ex => "Ex",
            Self::Crush => "Crush",
            Self::Colleague => "Colleague",
            Self::Classmate => "Classmate",
            Self::Roommate => "Roommate",
            Self::Family => "Family",
            Self::Sibling => "Sibling",
            Self::Acquaintance => "Acquaintance",
            Self::Other => "Other",
        }
    }

    pub fn category(self) -> RelationshipCategory {
        match self {
            Self::Partner | Self::Ex | Self::Crush => RelationshipCategory::Romantic,
            Self::Colleague | Self::Classmate => RelationshipCategory::Professional,
            Self::Family | Self::Sibling => RelationshipCategory::Family,
            Self::Friend
            | Self::CloseFriend
            | Self::BestFriend
            | Self::ChildhoodFriend
            | Self::Roommate
            | Self::Acquaintance
            | Self::Other => RelationshipCategory::Default,
        }
    }

    pub fn bond(self) -> BondStrength {
        match self {
            Self::Acquaintance | Self::Other => BondStrength::DISTANT,
            Self::Colleague | Self::Classmate | Self::Ex | Self::Crush => BondStrength(2),
            Self::Friend | Self::ChildhoodFriend | Self::Roommate => BondStrength(3),
            Self::CloseFriend | Self::Partner | Self::Family | Self::Sibling => BondStrength(4),
            Self::BestFriend => BondStrength::INSEPARABLE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationshipCategory {
    Default,
    Romantic,
    Family,
    Professional,
}

impl RelationshipCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Social",
            Self::Romantic => "Romantic",
            Self::Family => "Family",
            Self::Professional => "Professional",
        }
    }
}

/// How close two people are, from 1 (distant) to 5 (inseparable).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BondStrength(u8);

impl BondStrength {
    pub const DISTANT: Self = Self(1);
    pub const INSEPARABLE: Self = Self(5);

    #[cfg(test)]
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Index into five-entry tables ordered from inseparable to distant.
    pub fn table_index(self) -> usize {
        usize::from(5 - self.0)
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Distant",
            2 => "Casual",
            3 => "Moderate",
            4 => "Close",
            _ => "Inseparable",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cohort_ids: Vec<String>,
    #[serde(default)]
    pub is_ego: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Relationship {
    pub fn category(&self) -> RelationshipCategory {
        self.kind.category()
    }

    pub fn bond(&self) -> BondStrength {
        self.kind.bond()
    }

    pub fn touches(&self, person_id: &str) -> bool {
        self.source_id == person_id || self.target_id == person_id
    }

    pub fn other_end(&self, person_id: &str) -> Option<&str> {
        if self.source_id == person_id {
            Some(self.target_id.as_str())
        } else if self.target_id == person_id {
            Some(self.source_id.as_str())
        } else {
            None
        }
    }

    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source_id == a && self.target_id == b) || (self.source_id == b && self.target_id == a)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialGraph {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub cohorts: Vec<Cohort>,
    #[serde(default)]
    pub active_cohort_id: Option<String>,
    pub metadata: GraphMetadata,
}

#[derive(Clone, Debug, Default)]
pub struct DegreeStats {
    pub degree: HashMap<String, usize>,
    /// Largest degree among non-ego persons, never below 1.
    pub max_degree: usize,
}

impl DegreeStats {
    pub fn of(&self, person_id: &str) -> usize {
        self.degree.get(person_id).copied().unwrap_or(0)
    }
}

impl SocialGraph {
    pub fn ego(&self) -> Option<&Person> {
        self.persons.iter().find(|person| person.is_ego)
    }

    pub fn ego_id(&self) -> Option<&str> {
        self.ego().map(|person| person.id.as_str())
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.id == id)
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|relationship| relationship.id == id)
    }

    pub fn cohort(&self, id: &str) -> Option<&Cohort> {
        self.cohorts.iter().find(|cohort| cohort.id == id)
    }

    pub fn relationship_between(&self, a: &str, b: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|relationship| relationship.connects(a, b))
    }

    pub fn degree_stats(&self) -> DegreeStats {
        let mut degree: HashMap<String, usize> = HashMap::with_capacity(self.persons.len());
        for relationship in &self.relationships {
            *degree.entry(relationship.source_id.clone()).or_default() += 1;
            *degree.entry(relationship.target_id.clone()).or_default() += 1;
        }

        let ego_id = self.ego_id();
        let max_degree = degree
            .iter()
            .filter(|(id, _)| Some(id.as_str()) != ego_id)
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(0)
            .max(1);

        DegreeStats { degree, max_degree }
    }

    pub fn best_bond_to_ego(&self) -> HashMap<String, BondStrength> {
        let mut best = HashMap::new();
        let Some(ego_id) = self.ego_id() else {
            return best;
        };

        for relationship in &self.relationships {
            let Some(other) = relationship.other_end(ego_id) else {
                continue;
            };
            if other == ego_id {
                continue;
            }

            let bond = relationship.bond();
            best.entry(other.to_owned())
                .and_modify(|current: &mut BondStrength| *current = (*current).max(bond))
                .or_insert(bond);
        }
        best
    }

    pub fn members_of<'a>(&'a self, cohort_id: &'a str) -> impl Iterator<Item = &'a Person> + 'a {
        self.persons
            .iter()
            .filter(move |person| person.cohort_ids.iter().any(|id| id == cohort_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, is_ego: bool) -> Person {
        Person {
            id: id.to_owned(),
            name: id.to_owned(),
            cohort_ids: Vec::new(),
            is_ego,
            notes: None,
        }
    }

    fn link(id: &str, source: &str, target: &str, kind: RelationshipType) -> Relationship {
        Relationship {
            id: id.to_owned(),
            source_id: source.to_owned(),
            target_id: target.to_owned(),
            kind,
            label: None,
            notes: None,
        }
    }

    fn graph(persons: Vec<Person>, relationships: Vec<Relationship>) -> SocialGraph {
        SocialGraph {
            persons,
            relationships,
            cohorts: Vec::new(),
            active_cohort_id: None,
            metadata: GraphMetadata {
                title: "test".to_owned(),
                created_at: String::new(),
                updated_at: String::new(),
            },
        }
    }

    #[test]
    fn bond_and_category_follow_relationship_type() {
        assert_eq!(RelationshipType::BestFriend.bond().get(), 5);
        assert_eq!(RelationshipType::Sibling.bond().get(), 4);
        assert_eq!(RelationshipType::Roommate.bond().get(), 3);
        assert_eq!(RelationshipType::Crush.bond().get(), 2);
        assert_eq!(RelationshipType::Other.bond().get(), 1);

        assert_eq!(RelationshipType::Ex.category(), RelationshipCategory::Romantic);
        assert_eq!(
            RelationshipType::Classmate.category(),
            RelationshipCategory::Professional
        );
        assert_eq!(RelationshipType::Family.category(), RelationshipCategory::Family);
        assert_eq!(RelationshipCategory::Default.label(), "Social");
        assert_eq!(RelationshipType::Roommate.category(), RelationshipCategory::Default);
    }

    #[test]
    fn bond_table_index_runs_from_inseparable() {
        assert_eq!(BondStrength::INSEPARABLE.table_index(), 0);
        assert_eq!(BondStrength::DISTANT.table_index(), 4);
        assert!(BondStrength::new(0).is_none());
        assert!(BondStrength::new(6).is_none());
    }

    #[test]
    fn max_degree_ignores_ego() {
        let graph = graph(
            vec![person("me", true), person("a", false), person("b", false), person("c", false)],
            vec![
                link("1", "me", "a", RelationshipType::Friend),
                link("2", "me", "b", RelationshipType::Friend),
                link("3", "me", "c", RelationshipType::Friend),
                link("4", "a", "b", RelationshipType::Friend),
            ],
        );

        let stats = graph.degree_stats();
        assert_eq!(stats.of("me"), 3);
        assert_eq!(stats.of("a"), 2);
        assert_eq!(stats.max_degree, 2);
    }

    #[test]
    fn best_bond_keeps_strongest_tie_to_ego() {
        let graph = graph(
            vec![person("me", true), person("a", false), person("b", false)],
            vec![
                link("1", "a", "me", RelationshipType::Colleague),
                link("2", "me", "a", RelationshipType::BestFriend),
                link("3", "a", "b", RelationshipType::Sibling),
            ],
        );

        let best = graph.best_bond_to_ego();
        assert_eq!(best.get("a").map(|bond| bond.get()), Some(5));
        assert!(!best.contains_key("b"));
    }

    #[test]
    fn best_bond_is_empty_without_ego() {
        let graph = graph(
            vec![person("a", false), person("b", false)],
            vec![link("1", "a", "b", RelationshipType::Friend)],
        );
        assert!(graph.best_bond_to_ego().is_empty());
    }
}
