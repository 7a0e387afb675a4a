use thiserror::Error;

/// Why a single entity registration or relationship could not be laid out.
///
/// These are component-local: one bad relationship never aborts the rest of
/// the diagram. Failures are collected and reported alongside the routed
/// geometry so the caller decides between a partial render and a hard stop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("relationship references unknown entity id '{0}'")]
    UnknownEntity(String),
    #[error("degenerate geometry: entity centers coincide, no connector direction exists")]
    DegenerateGeometry,
    #[error("duplicate entity id '{0}'")]
    DuplicateEntityId(String),
}
