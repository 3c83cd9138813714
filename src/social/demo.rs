use super::edit::timestamp;
use super::graph::{
    Cohort, GraphMetadata, Person, Relationship, RelationshipType, SocialGraph,
};

const COHORTS: [(&str, &str, &str); 4] = [
    ("c-school", "School", "#F97316"),
    ("c-college", "College", "#3B82F6"),
    ("c-work", "Work", "#22C55E"),
    ("c-neighborhood", "Neighborhood", "#A855F7"),
];

// (id, name, cohorts, tie to ego)
const PEOPLE: &[(&str, &str, &[&str], RelationshipType)] = &[
    ("p-vikram", "Vikram", &["c-school"], RelationshipType::Classmate),
    ("p-ananya", "Ananya", &["c-school"], RelationshipType::Classmate),
    ("p-siddharth", "Siddharth", &["c-school"], RelationshipType::ChildhoodFriend),
    ("p-meera", "Meera", &["c-school"], RelationshipType::Classmate),
    ("p-arjun", "Arjun", &["c-school"], RelationshipType::CloseFriend),
    ("p-karan", "Karan", &["c-school"], RelationshipType::Friend),
    ("p-dhruv", "Dhruv", &["c-school"], RelationshipType::Friend),
    ("p-rahul", "Rahul", &["c-school", "c-college"], RelationshipType::BestFriend),
    ("p-priya", "Priya", &["c-school", "c-college"], RelationshipType::Friend),
    ("p-amit", "Amit", &["c-school", "c-college"], RelationshipType::Classmate),
    ("p-rohan", "Rohan", &["c-college"], RelationshipType::Classmate),
    ("p-aishwarya", "Aishwarya", &["c-college"], RelationshipType::Friend),
    ("p-sneha", "Sneha", &["c-college"], RelationshipType::Classmate),
    ("p-gaurav", "Gaurav", &["c-college"], RelationshipType::Friend),
    ("p-manish", "Manish", &["c-college"], RelationshipType::Roommate),
    ("p-kunal", "Kunal", &["c-college"], RelationshipType::Roommate),
    ("p-harsh", "Harsh", &["c-college"], RelationshipType::Acquaintance),
    ("p-deepak", "Deepak", &["c-college", "c-work"], RelationshipType::Colleague),
    ("p-nikhil", "Nikhil", &["c-college", "c-work"], RelationshipType::Colleague),
    ("p-sarah", "Sarah", &["c-work"], RelationshipType::Colleague),
    ("p-james", "James", &["c-work"], RelationshipType::Colleague),
    ("p-emily", "Emily", &["c-work"], RelationshipType::Friend),
    ("p-michael", "Michael", &["c-work"], RelationshipType::Colleague),
    ("p-lisa", "Lisa", &["c-work"], RelationshipType::Acquaintance),
    ("p-david", "David", &["c-work"], RelationshipType::Colleague),
    ("p-olivia", "Olivia", &["c-work"], RelationshipType::CloseFriend),
    ("p-tom", "Tom", &["c-work", "c-neighborhood"], RelationshipType::Friend),
    ("p-maria", "Maria", &["c-neighborhood"], RelationshipType::Acquaintance),
    ("p-jose", "José", &["c-neighborhood"], RelationshipType::Friend),
    ("p-chen", "Chen", &["c-neighborhood"], RelationshipType::Acquaintance),
    ("p-fatima", "Fatima", &["c-neighborhood"], RelationshipType::Friend),
    ("p-mom", "Mom", &[], RelationshipType::Family),
    ("p-dad", "Dad", &[], RelationshipType::Family),
    ("p-sis", "Anika", &[], RelationshipType::Sibling),
    ("p-alex", "Alex", &[], RelationshipType::Partner),
    ("p-sam", "Sam", &[], RelationshipType::Ex),
    ("p-jordan", "Jordan", &[], RelationshipType::Crush),
    ("p-riley", "Riley", &[], RelationshipType::Other),
];

const CROSS_LINKS: &[(&str, &str, RelationshipType)] = &[
    ("p-vikram", "p-ananya", RelationshipType::Classmate),
    ("p-siddharth", "p-arjun", RelationshipType::BestFriend),
    ("p-arjun", "p-karan", RelationshipType::Friend),
    ("p-meera", "p-dhruv", RelationshipType::Friend),
    ("p-rahul", "p-priya", RelationshipType::CloseFriend),
    ("p-rahul", "p-amit", RelationshipType::Friend),
    ("p-rahul", "p-arjun", RelationshipType::Friend),
    ("p-priya", "p-aishwarya", RelationshipType::Friend),
    ("p-manish", "p-kunal", RelationshipType::Roommate),
    ("p-rohan", "p-sneha", RelationshipType::Classmate),
    ("p-gaurav", "p-harsh", RelationshipType::Acquaintance),
    ("p-deepak", "p-nikhil", RelationshipType::Colleague),
    ("p-deepak", "p-rohan", RelationshipType::Friend),
    ("p-sarah", "p-james", RelationshipType::Colleague),
    ("p-emily", "p-olivia", RelationshipType::CloseFriend),
    ("p-michael", "p-david", RelationshipType::Colleague),
    ("p-lisa", "p-sarah", RelationshipType::Colleague),
    ("p-tom", "p-emily", RelationshipType::Friend),
    ("p-tom", "p-jose", RelationshipType::Friend),
    ("p-maria", "p-jose", RelationshipType::Partner),
    ("p-chen", "p-fatima", RelationshipType::Friend),
    ("p-mom", "p-dad", RelationshipType::Partner),
    ("p-mom", "p-sis", RelationshipType::Family),
    ("p-dad", "p-sis", RelationshipType::Family),
    ("p-alex", "p-olivia", RelationshipType::Friend),
];

/// A fixed sample network with overlapping cohorts and every relationship type.
pub fn demo_graph() -> SocialGraph {
    let now = timestamp();
    let mut persons = Vec::with_capacity(PEOPLE.len() + 1);
    persons.push(Person {
        id: "ego".to_owned(),
        name: "Me".to_owned(),
        cohort_ids: Vec::new(),
        is_ego: true,
        notes: None,
    });

    let mut relationships = Vec::with_capacity(PEOPLE.len() + CROSS_LINKS.len());
    for (id, name, cohorts, tie) in PEOPLE {
        persons.push(Person {
            id: (*id).to_owned(),
            name: (*name).to_owned(),
            cohort_ids: cohorts.iter().map(|cohort| (*cohort).to_owned()).collect(),
            is_ego: false,
            notes: None,
        });
        relationships.push(Relationship {
            id: format!("r-ego-{id}"),
            source_id: "ego".to_owned(),
            target_id: (*id).to_owned(),
            kind: *tie,
            label: None,
            notes: None,
        });
    }

    for (index, (source, target, kind)) in CROSS_LINKS.iter().enumerate() {
        relationships.push(Relationship {
            id: format!("r-{index}"),
            source_id: (*source).to_owned(),
            target_id: (*target).to_owned(),
            kind: *kind,
            label: None,
            notes: None,
        });
    }

    SocialGraph {
        persons,
        relationships,
        cohorts: COHORTS
            .iter()
            .map(|(id, name, color)| Cohort {
                id: (*id).to_owned(),
                name: (*name).to_owned(),
                color: (*color).to_owned(),
            })
            .collect(),
        active_cohort_id: None,
        metadata: GraphMetadata {
            title: "Demo network".to_owned(),
            created_at: now.clone(),
            updated_at: now,
        },
    }
}
