use std::collections::HashMap;

use super::error::LayoutError;
use super::router::{route, RouterOptions};
use super::types::{Connector, Entity, Relationship};

/// One relationship that could not be routed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingFailure {
    pub from: String,
    pub to: String,
    pub error: LayoutError,
}

/// Everything a render sink needs: the entity rectangles, the routed
/// connectors in declaration order, and every failure that was recorded
/// along the way.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub entities: Vec<Entity>,
    pub connectors: Vec<Connector>,
    pub errors: Vec<RoutingFailure>,
}

/// Owns one diagram's entities and relationships and drives routing.
///
/// Entities are registered first; relationships are validated against the
/// registered set as they arrive, not at layout time. There is no shared or
/// global state: independent diagrams can be laid out on separate threads
/// without coordination.
#[derive(Debug, Default)]
pub struct Diagram {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
    rejected: Vec<RoutingFailure>,
    options: RouterOptions,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Register an entity. The first registration of an id wins: a second
    /// entity with the same id is rejected and the original stands
    /// untouched. Rectangles must be finite with positive extent; note that
    /// `NaN <= 0.0` is false, so the finiteness check has to come first.
    pub fn add_entity(&mut self, entity: Entity) -> Result<(), LayoutError> {
        if self.index.contains_key(&entity.id) {
            return Err(LayoutError::DuplicateEntityId(entity.id));
        }
        if !entity.rect.is_finite() || entity.rect.width <= 0.0 || entity.rect.height <= 0.0 {
            return Err(LayoutError::DegenerateGeometry);
        }
        self.index.insert(entity.id.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    /// Declare a relationship between two registered entities.
    ///
    /// An endpoint that does not resolve rejects the whole relationship; the
    /// rejection is returned here and also resurfaces in
    /// [`LayoutResult::errors`], so an ignored `Err` cannot make the
    /// relationship vanish silently.
    pub fn add_relationship(&mut self, rel: Relationship) -> Result<(), LayoutError> {
        let missing = [&rel.from, &rel.to]
            .into_iter()
            .find(|id| !self.index.contains_key(*id));
        if let Some(id) = missing {
            let error = LayoutError::UnknownEntity(id.clone());
            self.rejected.push(RoutingFailure {
                from: rel.from.clone(),
                to: rel.to.clone(),
                error: error.clone(),
            });
            return Err(error);
        }
        self.relationships.push(rel);
        Ok(())
    }

    /// Route every relationship and hand back the assembled geometry.
    ///
    /// Pure and idempotent: unchanged input yields bit-identical endpoints
    /// on every call. A relationship that fails to route is recorded in
    /// `errors`; the rest of the diagram is still produced.
    pub fn layout(&self) -> LayoutResult {
        let mut connectors = Vec::with_capacity(self.relationships.len());
        let mut errors = self.rejected.clone();

        for rel in &self.relationships {
            let source = &self.entities[self.index[&rel.from]];
            let target = &self.entities[self.index[&rel.to]];
            match route(source, target, rel, &self.options) {
                Ok(connector) => connectors.push(connector),
                Err(error) => errors.push(RoutingFailure {
                    from: rel.from.clone(),
                    to: rel.to.clone(),
                    error,
                }),
            }
        }

        LayoutResult {
            entities: self.entities.clone(),
            connectors,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::geometry::Rect;
    use crate::diagram::types::Cardinality;

    fn entity(id: &str, rect: Rect) -> Entity {
        Entity {
            id: id.to_string(),
            label: id.to_string(),
            rect,
            fields: Vec::new(),
            category: None,
        }
    }

    fn rel(from: &str, to: &str) -> Relationship {
        Relationship {
            from: from.to_string(),
            to: to.to_string(),
            cardinality: Cardinality::OneToMany,
            arrow: false,
        }
    }

    fn two_entity_diagram() -> Diagram {
        let mut diagram = Diagram::new();
        diagram
            .add_entity(entity("a", Rect::new(0.0, 0.0, 1.0, 1.0)))
            .unwrap();
        diagram
            .add_entity(entity("b", Rect::new(3.0, 0.0, 1.0, 1.0)))
            .unwrap();
        diagram
    }

    #[test]
    fn duplicate_id_is_rejected_and_original_stands() {
        let mut diagram = Diagram::new();
        diagram
            .add_entity(entity("X", Rect::new(0.0, 0.0, 1.0, 1.0)))
            .unwrap();

        let err = diagram
            .add_entity(entity("X", Rect::new(5.0, 5.0, 2.0, 2.0)))
            .unwrap_err();
        assert_eq!(err, LayoutError::DuplicateEntityId("X".to_string()));

        let kept = diagram.entity("X").unwrap();
        assert_eq!(kept.rect, Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn zero_extent_rect_is_rejected() {
        let mut diagram = Diagram::new();
        let err = diagram
            .add_entity(entity("flat", Rect::new(0.0, 0.0, 1.0, 0.0)))
            .unwrap_err();
        assert_eq!(err, LayoutError::DegenerateGeometry);
        assert!(diagram.entity("flat").is_none());
    }

    #[test]
    fn non_finite_rect_is_rejected() {
        // `NaN <= 0.0` is false; these must not slip past the extent check
        // and later poison every connector touching them.
        let bad = [
            Rect::new(f32::NAN, 0.0, 1.0, 1.0),
            Rect::new(0.0, 0.0, f32::NAN, 1.0),
            Rect::new(0.0, f32::INFINITY, 1.0, 1.0),
            Rect::new(0.0, 0.0, 1.0, f32::NEG_INFINITY),
        ];
        for rect in bad {
            let mut diagram = Diagram::new();
            let err = diagram.add_entity(entity("w", rect)).unwrap_err();
            assert_eq!(err, LayoutError::DegenerateGeometry);
            assert!(diagram.entity("w").is_none());
        }
    }

    #[test]
    fn nan_rect_never_reaches_routing() {
        let mut diagram = two_entity_diagram();
        assert!(diagram
            .add_entity(entity("w", Rect::new(f32::NAN, 0.0, 1.0, 1.0)))
            .is_err());
        // The rejected entity is unknown to later relationships.
        let err = diagram.add_relationship(rel("a", "w")).unwrap_err();
        assert_eq!(err, LayoutError::UnknownEntity("w".to_string()));
        diagram.add_relationship(rel("a", "b")).unwrap();

        let layout = diagram.layout();
        assert_eq!(layout.connectors.len(), 1);
        for c in &layout.connectors {
            assert!(c.start.x.is_finite() && c.start.y.is_finite());
            assert!(c.end.x.is_finite() && c.end.y.is_finite());
        }
    }

    #[test]
    fn unknown_entity_lands_in_errors_never_in_connectors() {
        let mut diagram = two_entity_diagram();
        let err = diagram.add_relationship(rel("a", "ghost")).unwrap_err();
        assert_eq!(err, LayoutError::UnknownEntity("ghost".to_string()));

        let layout = diagram.layout();
        assert!(layout.connectors.is_empty());
        assert_eq!(layout.errors.len(), 1);
        assert_eq!(
            layout.errors[0].error,
            LayoutError::UnknownEntity("ghost".to_string())
        );
        assert_eq!(layout.errors[0].to, "ghost");
    }

    #[test]
    fn self_relationship_is_degenerate_and_excluded() {
        let mut diagram = two_entity_diagram();
        diagram.add_relationship(rel("a", "a")).unwrap();

        let layout = diagram.layout();
        assert!(layout.connectors.is_empty());
        assert_eq!(layout.errors.len(), 1);
        assert_eq!(layout.errors[0].error, LayoutError::DegenerateGeometry);
    }

    #[test]
    fn one_bad_relationship_does_not_abort_the_rest() {
        let mut diagram = two_entity_diagram();
        diagram.add_relationship(rel("a", "a")).unwrap();
        diagram.add_relationship(rel("a", "b")).unwrap();

        let layout = diagram.layout();
        assert_eq!(layout.connectors.len(), 1);
        assert_eq!(layout.connectors[0].to, "b");
        assert_eq!(layout.errors.len(), 1);
    }

    #[test]
    fn connectors_preserve_declaration_order() {
        let mut diagram = two_entity_diagram();
        diagram
            .add_entity(entity("c", Rect::new(0.0, 3.0, 1.0, 1.0)))
            .unwrap();
        diagram.add_relationship(rel("b", "c")).unwrap();
        diagram.add_relationship(rel("a", "b")).unwrap();
        diagram.add_relationship(rel("a", "c")).unwrap();

        let layout = diagram.layout();
        let order: Vec<(&str, &str)> = layout
            .connectors
            .iter()
            .map(|c| (c.from.as_str(), c.to.as_str()))
            .collect();
        assert_eq!(order, vec![("b", "c"), ("a", "b"), ("a", "c")]);
    }

    #[test]
    fn layout_is_idempotent() {
        let mut diagram = two_entity_diagram();
        diagram.add_relationship(rel("a", "b")).unwrap();

        let first = diagram.layout();
        let second = diagram.layout();

        assert_eq!(first.connectors.len(), second.connectors.len());
        for (x, y) in first.connectors.iter().zip(second.connectors.iter()) {
            // Bit-identical, not merely close.
            assert_eq!(x.start, y.start);
            assert_eq!(x.end, y.end);
            assert_eq!(x.decorations, y.decorations);
        }
    }
}
