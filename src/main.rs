use boxline::diagram::render_layout;
use boxline::{DiagramSpec, DiagramStyle};
use clap::Parser;
use resvg::usvg;
use std::path::PathBuf;
use tiny_skia::{Pixmap, Transform};

/// Declarative diagram renderer: entity/relationship specs in, images out.
#[derive(Parser, Debug)]
#[command(name = "boxline")]
#[command(version)]
#[command(about = "Render entity/relationship diagram specs to SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Input spec file in JSON, TOML or YAML (use "-" for JSON on stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Path to a style TOML file
    #[arg(short, long, value_name = "STYLE")]
    style: Option<PathBuf>,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Padding around the diagram in pixels
    #[arg(long, default_value_t = 20.0)]
    padding: f32,

    /// Treat any layout error as fatal instead of rendering a partial diagram
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let style = if let Some(ref style_path) = args.style {
        if style_path.exists() && style_path.is_file() {
            let content = std::fs::read_to_string(style_path)
                .map_err(|e| format!("Failed to read style file: {}", e))?;
            DiagramStyle::from_toml(&content)?
        } else {
            return Err(format!("Style file not found: {}", style_path.display()));
        }
    } else {
        DiagramStyle::default()
    };

    let spec = if args.input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        DiagramSpec::from_json(&buffer)?
    } else {
        DiagramSpec::from_path(&args.input)?
    };

    let (diagram, spec_errors) = spec.assemble();
    let layout = diagram.layout();

    for error in &spec_errors {
        eprintln!("warning: {}", error);
    }
    for failure in &layout.errors {
        eprintln!(
            "warning: relationship {} -> {}: {}",
            failure.from, failure.to, failure.error
        );
    }
    if args.strict && (!spec_errors.is_empty() || !layout.errors.is_empty()) {
        return Err("diagram has layout errors (running with --strict)".to_string());
    }

    let (inner_svg, width, height) = render_layout(
        &layout,
        spec.title.as_deref(),
        &spec.legend,
        (spec.world[0], spec.world[1]),
        &style,
    );

    let pad = args.padding;
    let total_w = width + pad * 2.0;
    let total_h = height + pad * 2.0;

    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{total_w}" height="{total_h}" viewBox="0 0 {total_w} {total_h}">
<rect width="{total_w}" height="{total_h}" fill="{canvas_bg}"/>
<g transform="translate({pad},{pad})">
{inner}
</g>
</svg>"#,
        total_w = total_w,
        total_h = total_h,
        canvas_bg = style.background,
        pad = pad,
        inner = inner_svg,
    );

    let output_ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .ok_or("Output file has no extension")?
        .to_ascii_lowercase();

    match output_ext.as_str() {
        "svg" => {
            std::fs::write(&args.output, &svg)
                .map_err(|e| format!("Failed to write SVG: {}", e))?;
            eprintln!("SVG saved to: {}", args.output.display());
        }
        "png" => {
            let png_data = svg_to_png(&svg, args.png_scale)?;
            std::fs::write(&args.output, png_data)
                .map_err(|e| format!("Failed to write PNG: {}", e))?;
            eprintln!("PNG saved to: {}", args.output.display());
        }
        "pdf" => {
            let pdf_data = svg_to_pdf(&svg)?;
            std::fs::write(&args.output, pdf_data)
                .map_err(|e| format!("Failed to write PDF: {}", e))?;
            eprintln!("PDF saved to: {}", args.output.display());
        }
        _ => {
            return Err(format!(
                "Unsupported output format: .{} (use .svg, .png or .pdf)",
                output_ext
            ));
        }
    }

    Ok(())
}

fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, String> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("Invalid --png-scale value: {}", scale));
    }

    let mut opts = usvg::Options::default();
    opts.fontdb_mut().load_system_fonts();

    let tree =
        usvg::Tree::from_str(svg, &opts).map_err(|e| format!("Failed to parse SVG: {}", e))?;

    let svg_width = (tree.size().width() * scale).ceil() as u32;
    let svg_height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(svg_width, svg_height).ok_or("Failed to create pixmap")?;
    let transform = Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| format!("Failed to encode PNG: {}", e))
}

fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, String> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();

    let opts = svg2pdf::usvg::Options {
        fontdb: std::sync::Arc::new(fontdb),
        ..Default::default()
    };

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| format!("Failed to parse SVG: {}", e))?;

    let options = svg2pdf::ConversionOptions {
        embed_text: false,
        ..Default::default()
    };
    let page_options = svg2pdf::PageOptions::default();

    svg2pdf::to_pdf(&tree, options, page_options)
        .map_err(|e| format!("Failed to convert SVG to PDF: {}", e))
}
