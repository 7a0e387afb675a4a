use super::error::LayoutError;
use super::geometry::{clip_to_border, direction, perpendicular, Vec2};
use super::types::{Cardinality, Connector, Decoration, Entity, Relationship};

/// Marker sizing, in diagram units.
///
/// All values are fixed constants uncorrelated with rectangle size; that
/// matches how the markers have always been drawn, so they are kept as
/// configuration rather than derived from the boxes.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Length of each crow's-foot tine.
    pub marker_size: f32,
    /// How far the "1" glyph sits from the one-side border point.
    pub one_offset: f32,
    /// Length of the arrowhead; its base is half as wide on each side.
    pub arrow_size: f32,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            marker_size: 0.01,
            one_offset: 0.02,
            arrow_size: 0.02,
        }
    }
}

/// Route one relationship between two entities.
///
/// The connector runs center-to-center, clipped so both endpoints sit
/// exactly on the respective rectangle borders, then decorated according to
/// the relationship's cardinality and arrow flag. Fails with
/// `DegenerateGeometry` when the centers coincide, or when the boxes
/// overlap so far that both clipped endpoints collapse onto the same point.
pub fn route(
    source: &Entity,
    target: &Entity,
    rel: &Relationship,
    options: &RouterOptions,
) -> Result<Connector, LayoutError> {
    let dir = direction(source.rect.center(), target.rect.center())
        .ok_or(LayoutError::DegenerateGeometry)?;

    let start = clip_to_border(&source.rect, dir);
    let end = clip_to_border(&target.rect, -dir);

    // Markers are oriented along the clipped segment, not the center axis,
    // so recompute the direction between the border points.
    let axis = direction(start, end).ok_or(LayoutError::DegenerateGeometry)?;

    let mut decorations = Vec::new();
    match rel.cardinality {
        Cardinality::OneToOne => {}
        Cardinality::OneToMany => {
            decorations.push(Decoration::One {
                at: start + axis * options.one_offset,
            });
            decorations.push(crow_foot(end, axis, options.marker_size));
        }
        Cardinality::ManyToMany => {
            decorations.push(crow_foot(start, -axis, options.marker_size));
            decorations.push(crow_foot(end, axis, options.marker_size));
        }
    }
    if rel.arrow {
        decorations.push(arrow_head(end, axis, options.arrow_size));
    }

    Ok(Connector {
        from: source.id.clone(),
        to: target.id.clone(),
        start,
        end,
        cardinality: rel.cardinality,
        decorations,
    })
}

/// Three tines fanned from the endpoint back along the incoming axis:
/// straight, and the two symmetric perpendicular offsets.
fn crow_foot(at: Vec2, axis: Vec2, size: f32) -> Decoration {
    let back = at - axis * size;
    let fan = perpendicular(axis) * size;
    Decoration::CrowFoot {
        tines: [(at, back), (at, back + fan), (at, back - fan)],
    }
}

/// Filled triangle with its tip on the border and a base half the head
/// length wide on each side.
fn arrow_head(at: Vec2, axis: Vec2, size: f32) -> Decoration {
    let base = at - axis * size;
    let wing = perpendicular(axis) * (size / 2.0);
    Decoration::Arrow {
        head: [at, base + wing, base - wing],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::geometry::Rect;

    fn entity(id: &str, rect: Rect) -> Entity {
        Entity {
            id: id.to_string(),
            label: id.to_string(),
            rect,
            fields: Vec::new(),
            category: None,
        }
    }

    fn rel(from: &str, to: &str, cardinality: Cardinality) -> Relationship {
        Relationship {
            from: from.to_string(),
            to: to.to_string(),
            cardinality,
            arrow: false,
        }
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "expected {} ~ {}", a, b);
    }

    #[test]
    fn vertical_dominant_pair_clips_to_facing_edges() {
        // Project sits above Character; the connector must leave through
        // Project's bottom edge and enter through Character's top edge.
        let project = entity("Project", Rect::new(0.1, 0.8, 0.15, 0.15));
        let character = entity("Character", Rect::new(0.1, 0.5, 0.15, 0.20));

        let connector = route(
            &project,
            &character,
            &rel("Project", "Character", Cardinality::OneToMany),
            &RouterOptions::default(),
        )
        .unwrap();

        assert_close(connector.start.x, 0.175);
        assert_close(connector.start.y, 0.8);
        assert_close(connector.end.x, 0.175);
        assert_close(connector.end.y, 0.7);

        // Crow's foot on the many side, "1" on the one side.
        assert!(matches!(connector.decorations[0], Decoration::One { .. }));
        assert!(matches!(
            connector.decorations[1],
            Decoration::CrowFoot { .. }
        ));
    }

    #[test]
    fn one_to_one_has_no_decorations() {
        let a = entity("a", Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = entity("b", Rect::new(3.0, 0.0, 1.0, 1.0));
        let connector = route(
            &a,
            &b,
            &rel("a", "b", Cardinality::OneToOne),
            &RouterOptions::default(),
        )
        .unwrap();
        assert!(connector.decorations.is_empty());
    }

    #[test]
    fn one_to_many_has_one_marker_and_one_crow_foot() {
        let a = entity("a", Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = entity("b", Rect::new(3.0, 0.0, 1.0, 1.0));
        let connector = route(
            &a,
            &b,
            &rel("a", "b", Cardinality::OneToMany),
            &RouterOptions::default(),
        )
        .unwrap();

        let ones = connector
            .decorations
            .iter()
            .filter(|d| matches!(d, Decoration::One { .. }))
            .count();
        let feet = connector
            .decorations
            .iter()
            .filter(|d| matches!(d, Decoration::CrowFoot { .. }))
            .count();
        assert_eq!(ones, 1);
        assert_eq!(feet, 1);
    }

    #[test]
    fn many_to_many_has_crow_feet_at_both_ends() {
        let a = entity("a", Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = entity("b", Rect::new(3.0, 0.0, 1.0, 1.0));
        let connector = route(
            &a,
            &b,
            &rel("a", "b", Cardinality::ManyToMany),
            &RouterOptions::default(),
        )
        .unwrap();

        assert_eq!(connector.decorations.len(), 2);
        assert!(connector
            .decorations
            .iter()
            .all(|d| matches!(d, Decoration::CrowFoot { .. })));
    }

    #[test]
    fn crow_foot_tines_fan_symmetrically() {
        let a = entity("a", Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = entity("b", Rect::new(3.0, 0.0, 1.0, 1.0));
        let options = RouterOptions {
            marker_size: 0.25,
            ..RouterOptions::default()
        };
        let connector = route(
            &a,
            &b,
            &rel("a", "b", Cardinality::OneToMany),
            &options,
        )
        .unwrap();

        let Some(Decoration::CrowFoot { tines }) = connector
            .decorations
            .iter()
            .find(|d| matches!(d, Decoration::CrowFoot { .. }))
        else {
            panic!("expected a crow's foot");
        };

        // All tines start at the clipped endpoint.
        for (from, _) in tines {
            assert_eq!(*from, connector.end);
        }
        // Straight tine points back along the axis (here: -x).
        assert_close(tines[0].1.x, connector.end.x - 0.25);
        assert_close(tines[0].1.y, connector.end.y);
        // The fanned tines are mirror images across the axis.
        assert_close(tines[1].1.y - connector.end.y, -(tines[2].1.y - connector.end.y));
    }

    #[test]
    fn arrow_relationship_gets_a_head_at_the_target() {
        let a = entity("a", Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = entity("b", Rect::new(3.0, 0.0, 1.0, 1.0));
        let mut arrow_rel = rel("a", "b", Cardinality::OneToOne);
        arrow_rel.arrow = true;
        let options = RouterOptions {
            arrow_size: 0.2,
            ..RouterOptions::default()
        };
        let connector = route(&a, &b, &arrow_rel, &options).unwrap();

        assert_eq!(connector.decorations.len(), 1);
        let Decoration::Arrow { head } = &connector.decorations[0] else {
            panic!("expected an arrowhead");
        };

        // Tip sits on the target border, base behind it along -x.
        assert_eq!(head[0], connector.end);
        assert_close(head[1].x, connector.end.x - 0.2);
        assert_close(head[2].x, connector.end.x - 0.2);
        // Base corners fan half the head length to each side.
        assert_close(head[1].y - connector.end.y, 0.1);
        assert_close(head[2].y - connector.end.y, -0.1);
    }

    #[test]
    fn coincident_centers_are_degenerate() {
        let a = entity("a", Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = entity("b", Rect::new(0.25, 0.25, 0.5, 0.5));
        let err = route(
            &a,
            &b,
            &rel("a", "b", Cardinality::OneToOne),
            &RouterOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, LayoutError::DegenerateGeometry);
    }
}
