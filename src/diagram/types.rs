use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Vec2};

/// A labeled rectangular diagram node. Position and size come from the
/// caller; nothing here is computed.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: String,
    pub label: String,
    pub rect: Rect,
    /// Text lines rendered inside the box, below the label (fields of a
    /// table, sub-items of a component).
    pub fields: Vec<String>,
    /// Legend/palette category; the render sink maps it to a fill color.
    pub category: Option<String>,
}

/// Multiplicity of a relationship, controlling which end markers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
}

/// A directed association between two entities, declared by id.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub cardinality: Cardinality,
    /// Draw an arrowhead at the target end, for flow-style diagrams where
    /// the direction matters more than the multiplicity.
    pub arrow: bool,
}

/// A marker attached to one connector endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    /// Anchor for the "1" glyph, nudged off the border along the connector.
    One { at: Vec2 },
    /// Crow's-foot "many" marker: the straight tine plus the two fanned
    /// perpendicular tines, each a segment starting at the endpoint.
    CrowFoot { tines: [(Vec2, Vec2); 3] },
    /// Filled arrowhead triangle: tip on the border, base corners fanned
    /// back along the connector axis.
    Arrow { head: [Vec2; 3] },
}

/// The routed form of one relationship: a segment whose endpoints lie
/// exactly on the source and target borders, plus its end markers.
/// Recomputed whenever layout input changes; carries no identity of its own.
#[derive(Debug, Clone)]
pub struct Connector {
    pub from: String,
    pub to: String,
    pub start: Vec2,
    pub end: Vec2,
    pub cardinality: Cardinality,
    pub decorations: Vec<Decoration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}
