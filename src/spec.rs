use std::path::Path;

use serde::Deserialize;

use crate::diagram::geometry::Rect;
use crate::diagram::{
    Cardinality, Diagram, Entity, LayoutError, LegendEntry, Relationship, RouterOptions,
};

/// A diagram authored as data: entities with fixed positions, the
/// relationships between them, and presentation extras (title, legend).
///
/// This is the whole input contract; nothing is persisted and the layout is
/// recomputed from scratch every time the spec is assembled.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramSpec {
    #[serde(default)]
    pub title: Option<String>,
    /// Extent of the coordinate space the rects live in, y-up.
    #[serde(default = "default_world")]
    pub world: [f32; 2],
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub relationships: Vec<RelationshipSpec>,
    #[serde(default)]
    pub legend: Vec<LegendEntry>,
    /// Crow's-foot tine length override, in diagram units.
    #[serde(default)]
    pub marker_size: Option<f32>,
}

fn default_world() -> [f32; 2] {
    [1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySpec {
    pub id: String,
    /// Display label; the id doubles as the label when omitted.
    #[serde(default)]
    pub label: Option<String>,
    /// Origin x, origin y, width, height.
    pub rect: [f32; 4],
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipSpec {
    pub from: String,
    pub to: String,
    pub cardinality: Cardinality,
    #[serde(default)]
    pub arrow: bool,
}

impl DiagramSpec {
    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("Failed to parse spec as JSON: {}", e))
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse spec as TOML: {}", e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse spec as YAML: {}", e))
    }

    pub fn from_path(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read spec file {}: {}", path.display(), e))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            other => Err(format!(
                "Unsupported spec format: .{} (use .json, .toml, .yaml or .yml)",
                other
            )),
        }
    }

    /// Feed the spec into a [`Diagram`].
    ///
    /// Entity registrations that fail (duplicate ids, degenerate rects) are
    /// collected here; relationship rejections are not duplicated in the
    /// return value because the diagram itself reports them through
    /// `layout().errors`.
    pub fn assemble(&self) -> (Diagram, Vec<LayoutError>) {
        let mut options = RouterOptions::default();
        if let Some(size) = self.marker_size {
            options.marker_size = size;
        }

        let mut diagram = Diagram::with_options(options);
        let mut errors = Vec::new();

        for spec in &self.entities {
            let entity = Entity {
                id: spec.id.clone(),
                label: spec.label.clone().unwrap_or_else(|| spec.id.clone()),
                rect: Rect::new(spec.rect[0], spec.rect[1], spec.rect[2], spec.rect[3]),
                fields: spec.fields.clone(),
                category: spec.category.clone(),
            };
            if let Err(error) = diagram.add_entity(entity) {
                errors.push(error);
            }
        }

        for spec in &self.relationships {
            let rel = Relationship {
                from: spec.from.clone(),
                to: spec.to.clone(),
                cardinality: spec.cardinality,
                arrow: spec.arrow,
            };
            // Unknown-entity rejections resurface in layout().errors.
            let _ = diagram.add_relationship(rel);
        }

        (diagram, errors)
    }
}
