use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::TreeNode;
use crate::layout::{EdgeLayout, Layout};
use crate::navigation::Highlight;
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Draws a layout. `tree` supplies node labels; without it nodes are labelled
/// by id. Highlighted nodes only change colour, never geometry.
pub fn render_svg(
    layout: &Layout,
    tree: Option<&TreeNode>,
    highlight: &Highlight,
    theme: &Theme,
    config: &LayoutConfig,
    render_cfg: &RenderConfig,
) -> String {
    let mut svg = String::new();
    let width = layout.canvas.width.max(1.0);
    let height = layout.canvas.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render_cfg.background
    ));

    for edge in &layout.edges {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            points_to_path(edge),
            theme.line_color,
            config.connector_width
        ));
    }

    let labels = collect_labels(tree);
    for (id, pos) in &layout.positions {
        let lit = highlight.is_highlighted(id);
        let (fill, stroke, stroke_width) = if lit {
            (&theme.highlight_fill, &theme.highlight_border, 2.5)
        } else {
            (&theme.node_fill, &theme.node_border, 1.4)
        };
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" data-id=\"{}\"/>",
            pos.x,
            pos.y,
            config.node_width,
            config.node_height,
            fill,
            stroke,
            stroke_width,
            escape_xml(id),
            r = config.corner_radius,
        ));

        let (name, title) = labels
            .get(id.as_str())
            .copied()
            .unwrap_or((id.as_str(), None));
        let center_x = pos.x + config.node_width / 2.0;
        let title = title.filter(|_| render_cfg.show_titles);
        let name_y = if title.is_some() {
            pos.y + config.node_height / 2.0 - theme.font_size * 0.35
        } else {
            pos.y + config.node_height / 2.0 + theme.font_size * 0.35
        };
        let max_chars = max_chars_for(config, theme);
        svg.push_str(&format!(
            "<text x=\"{center_x:.2}\" y=\"{name_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(&truncate(name, max_chars))
        ));
        if let Some(title) = title {
            let title_y = name_y + theme.font_size * 1.3;
            svg.push_str(&format!(
                "<text x=\"{center_x:.2}\" y=\"{title_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                theme.font_family,
                theme.font_size * 0.85,
                theme.title_color,
                escape_xml(&truncate(title, max_chars))
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn collect_labels(tree: Option<&TreeNode>) -> HashMap<&str, (&str, Option<&str>)> {
    let mut labels = HashMap::new();
    let Some(root) = tree else {
        return labels;
    };
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        labels.insert(node.id.as_str(), (node.label(), node.field("title")));
        stack.extend(node.children.iter());
    }
    labels
}

fn max_chars_for(config: &LayoutConfig, theme: &Theme) -> usize {
    // Average glyph is roughly 0.55em wide.
    let usable = (config.node_width - config.label_padding * 2.0).max(0.0);
    let chars = usable / (theme.font_size * 0.55).max(1.0);
    chars.floor().max(1.0) as usize
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn points_to_path(edge: &EdgeLayout) -> String {
    let mut d = String::new();
    for (idx, (x, y)) in edge.points.iter().enumerate() {
        if idx == 0 {
            d.push_str(&format!("M {x:.2} {y:.2}"));
        } else {
            d.push_str(&format!(" L {x:.2} {y:.2}"));
        }
    }
    d
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
pub fn write_output_png(svg: &str, output: &Path, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().trim_matches('"').to_string();
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
