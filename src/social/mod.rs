mod demo;
mod edit;
mod graph;
mod store;

pub use demo::demo_graph;
pub use edit::{DEFAULT_COHORT_COLORS, GraphError};
pub use graph::{
    BondStrength, Cohort, DegreeStats, GraphMetadata, Person, Relationship, RelationshipCategory,
    RelationshipType, SocialGraph,
};
pub use store::{load_graph, parse_graph, save_graph, to_json};
