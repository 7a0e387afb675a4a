use crate::style::DiagramStyle;
use crate::xml::escape_xml;

use super::assemble::LayoutResult;
use super::geometry::Vec2;
use super::types::{Decoration, Entity, LegendEntry};

/// Paint the assembled geometry as an inner SVG fragment.
///
/// This is the render sink side of the contract: the layout result is
/// consumed as-is, and everything visual (colors, fonts, legend placement,
/// pixel scaling) is decided here. `world` is the extent of the diagram's
/// coordinate space; diagram space is y-up, so the sink flips the y axis
/// while mapping to pixels. Returns the fragment and its pixel size.
pub fn render_layout(
    layout: &LayoutResult,
    title: Option<&str>,
    legend: &[LegendEntry],
    world: (f32, f32),
    style: &DiagramStyle,
) -> (String, f32, f32) {
    let scale = style.scale;
    let title_band = if title.is_some() {
        style.title_font_size + 16.0
    } else {
        0.0
    };
    let legend_band = if legend.is_empty() {
        0.0
    } else {
        style.font_size + 22.0
    };

    let width = world.0 * scale;
    let height = title_band + world.1 * scale + legend_band;
    let map = |p: Vec2| -> (f32, f32) { (p.x * scale, title_band + (world.1 - p.y) * scale) };

    let mut svg = String::new();

    if let Some(title) = title {
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle" font-weight="bold">{}</text>"#,
            width / 2.0,
            style.title_font_size,
            style.font_family,
            style.title_font_size,
            style.text,
            escape_xml(title)
        ));
    }

    // Connectors first so entity boxes paint over the line ends.
    for connector in &layout.connectors {
        let (x1, y1) = map(connector.start);
        let (x2, y2) = map(connector.end);
        svg.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.1}" />"#,
            x1, y1, x2, y2, style.stroke, style.line_width
        ));
        for decoration in &connector.decorations {
            svg.push_str(&render_decoration(decoration, &map, style));
        }
    }

    for entity in &layout.entities {
        svg.push_str(&render_entity(entity, &map, style));
    }

    if !legend.is_empty() {
        svg.push_str(&render_legend(legend, width, height - 6.0, style));
    }

    (svg, width, height)
}

fn render_decoration(
    decoration: &Decoration,
    map: &impl Fn(Vec2) -> (f32, f32),
    style: &DiagramStyle,
) -> String {
    match decoration {
        Decoration::One { at } => {
            let (x, y) = map(*at);
            format!(
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle" dominant-baseline="middle">1</text>"#,
                x, y, style.font_family, style.field_font_size, style.text
            )
        }
        Decoration::CrowFoot { tines } => {
            let mut out = String::new();
            for (from, to) in tines {
                let (x1, y1) = map(*from);
                let (x2, y2) = map(*to);
                out.push_str(&format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.1}" />"#,
                    x1, y1, x2, y2, style.stroke, style.line_width
                ));
            }
            out
        }
        Decoration::Arrow { head } => {
            let points: Vec<String> = head
                .iter()
                .map(|p| {
                    let (x, y) = map(*p);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();
            format!(
                r#"<polygon points="{}" fill="{}" />"#,
                points.join(" "),
                style.stroke
            )
        }
    }
}

fn render_entity(
    entity: &Entity,
    map: &impl Fn(Vec2) -> (f32, f32),
    style: &DiagramStyle,
) -> String {
    let mut svg = String::new();

    // The rect origin is the lower-left corner in diagram space, so the
    // screen top-left maps from the top edge.
    let (x, y) = map(Vec2::new(entity.rect.x, entity.rect.top()));
    let w = entity.rect.width * style.scale;
    let h = entity.rect.height * style.scale;
    let fill = style.fill_for(entity.category.as_deref());

    svg.push_str(&format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.2}" stroke="{}" stroke-width="1" />"#,
        x, y, w, h, fill, style.fill_opacity, style.stroke
    ));

    // Label, centered, with a rule below it separating the field rows.
    let label_y = y + style.font_size + 4.0;
    svg.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle" font-weight="bold">{}</text>"#,
        x + w / 2.0,
        label_y,
        style.font_family,
        style.font_size,
        style.text,
        escape_xml(&entity.label)
    ));

    if !entity.fields.is_empty() {
        let rule_y = label_y + 5.0;
        svg.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1" />"#,
            x,
            rule_y,
            x + w,
            rule_y,
            style.stroke
        ));

        let mut field_y = rule_y + style.field_font_size + 4.0;
        for field in &entity.fields {
            svg.push_str(&format!(
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}">{}</text>"#,
                x + 5.0,
                field_y,
                style.font_family,
                style.field_font_size,
                style.text,
                escape_xml(field)
            ));
            field_y += style.field_font_size + 3.0;
        }
    }

    svg
}

fn render_legend(legend: &[LegendEntry], width: f32, y: f32, style: &DiagramStyle) -> String {
    let swatch = style.font_size;
    // No text measurement here; a per-character estimate keeps the row
    // roughly centered, which is all a legend needs.
    let item_width = |entry: &LegendEntry| -> f32 {
        swatch + 6.0 + entry.label.chars().count() as f32 * style.font_size * 0.55 + 24.0
    };
    let total: f32 = legend.iter().map(item_width).sum();
    let mut x = (width - total).max(0.0) / 2.0;

    let mut svg = String::new();
    for entry in legend {
        svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.2}" stroke="{}" stroke-width="1" />"#,
            x,
            y - swatch,
            swatch,
            swatch,
            entry.color,
            style.fill_opacity,
            style.stroke
        ));
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}">{}</text>"#,
            x + swatch + 6.0,
            y - 3.0,
            style.font_family,
            style.font_size,
            style.text,
            escape_xml(&entry.label)
        ));
        x += item_width(entry);
    }
    svg
}
