pub mod diagram;
pub mod spec;
pub mod style;
pub mod xml;

pub use diagram::{
    Cardinality, Connector, Decoration, Diagram, Entity, LayoutError, LayoutResult, LegendEntry,
    Relationship, RouterOptions, RoutingFailure,
};
pub use spec::DiagramSpec;
pub use style::DiagramStyle;
