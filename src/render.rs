use crate::config::RenderConfig;
use crate::layout::TreeLayout;
use crate::theme::Theme;
use crate::viewport::ViewportTransform;
use anyhow::Result;
use std::path::Path;

/// Thin rendering adapter: consumes a computed [`TreeLayout`] and emits an
/// SVG string. All geometry comes from the layout engine; nothing here
/// measures or re-positions.
pub fn render_svg(layout: &TreeLayout, theme: &Theme, config: &RenderConfig) -> String {
    render_svg_with_viewport(layout, theme, config, None)
}

/// Like [`render_svg`], composing the current viewport transform as a single
/// `<g>` wrapper so pan/zoom never requires recomputing the layout.
pub fn render_svg_with_viewport(
    layout: &TreeLayout,
    theme: &Theme,
    config: &RenderConfig,
    viewport: Option<&ViewportTransform>,
) -> String {
    let mut svg = String::new();
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    if let Some(transform) = viewport {
        svg.push_str(&format!(
            "<g transform=\"translate({:.2} {:.2}) scale({:.4})\">",
            transform.translate_x, transform.translate_y, transform.scale
        ));
    }

    for edge in &layout.edges {
        let d = points_to_path(&edge.points);
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            d, theme.branch_color, theme.branch_width
        ));
    }

    for node in &layout.nodes {
        if node.is_leaf {
            svg.push_str(&leaf_svg(layout, node.id, theme, config));
        } else if !node.name.is_empty() {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" dx=\"-4\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                node.x,
                node.y,
                theme.font_family,
                theme.font_size * 0.85,
                theme.internal_text_color,
                escape_xml(&node.name)
            ));
        }
    }

    if viewport.is_some() {
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn leaf_svg(
    layout: &TreeLayout,
    id: crate::layout::NodeId,
    theme: &Theme,
    config: &RenderConfig,
) -> String {
    let node = layout.node(id);
    let meta = node.metadata.as_ref();
    let is_query = config
        .query_name
        .as_deref()
        .is_some_and(|query| query.eq_ignore_ascii_case(&node.name));
    let color = if is_query {
        theme.query_color.as_str()
    } else {
        theme.leaf_text_color.as_str()
    };

    let mut out = format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\"/>",
        node.x, node.y, theme.node_radius, theme.node_color
    );

    let mut label = escape_xml(&node.name);
    if config.metadata_columns
        && let Some(meta) = meta
    {
        // Absent values render as a neutral dash, never as zero.
        let sim = meta
            .sequence_similarity
            .map_or("-".to_string(), |v| format!("{v:.2}"));
        let scc = meta
            .expression_correlation
            .map_or("-".to_string(), |v| format!("{v:.2}"));
        label.push_str(&escape_xml(&format!("  {sim}  {scc}")));
    }

    let text = format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" transform=\"rotate(90 {:.2} {:.2})\" dx=\"{}\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        node.x,
        node.y,
        node.x,
        node.y,
        config.label_gap,
        theme.font_family,
        theme.font_size,
        color,
        label
    );

    match meta.and_then(|m| m.external_link.as_deref()) {
        Some(link) => {
            out.push_str(&format!("<a href=\"{}\">{}</a>", escape_xml(link), text));
        }
        None => out.push_str(&text),
    }
    out
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}
