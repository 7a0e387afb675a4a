mod assemble;
mod error;
pub mod geometry;
mod render;
mod router;
mod types;

pub use assemble::{Diagram, LayoutResult, RoutingFailure};
pub use error::LayoutError;
pub use render::render_layout;
pub use router::{route, RouterOptions};
pub use types::{Cardinality, Connector, Decoration, Entity, LegendEntry, Relationship};
