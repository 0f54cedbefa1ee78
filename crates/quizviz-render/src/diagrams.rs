//! Diagram families for quiz visuals
//!
//! Each generator builds a fixed diagram family from numeric parameters:
//! solid cross-sections, wireframe projections of polyhedra, tessellation /
//! fractal / symmetry patterns, and N×N grids of shapes. All of them are
//! deterministic and total.

use serde::{Deserialize, Serialize};

use crate::svg::{render_document, SvgElement};

/// Visual style hints shared with the generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Clean outlines only
    Minimal,
    /// Adds guide lines and vertex markers
    Detailed,
    /// Filled, loosely composed shapes
    Abstract,
    /// Precise grid-based construction
    Geometric,
}

/// Diagram family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramType {
    /// Solid-of-revolution cross-sections
    CrossSection,
    /// Wireframe projections of 3D shapes
    ThreeDShapes,
    /// Tessellation / fractal / symmetry patterns
    Patterns,
    /// N×N grid-of-shapes matrices
    Matrix,
    /// Generic geometric composition
    Geometric,
}

/// Rendering options with the same defaults for every diagram family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub stroke_width: f64,
    pub stroke_color: String,
    pub fill_color: String,
    pub background_color: String,
    pub style: RenderStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            stroke_width: 2.0,
            stroke_color: "#000000".to_string(),
            fill_color: "none".to_string(),
            background_color: "#ffffff".to_string(),
            style: RenderStyle::Minimal,
        }
    }
}

impl RenderOptions {
    fn background(&self) -> SvgElement {
        SvgElement::new("rect")
            .attr("x", 0)
            .attr("y", 0)
            .attr("width", self.width)
            .attr("height", self.height)
            .attr("fill", &self.background_color)
    }

    fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// Render a diagram for a free-text description.
///
/// Keyword dispatch over the description picks the closest diagram family;
/// anything unrecognized degrades to the default symmetry pattern so the
/// caller always gets non-empty markup.
pub fn render(description: &str, diagram_type: DiagramType, options: &RenderOptions) -> String {
    let lower = description.to_lowercase();

    match diagram_type {
        DiagramType::CrossSection => {
            let plane_height = if lower.contains("center") { 0.0 } else { 0.5 };
            let plane_angle = if lower.contains("diagonal") { 45.0 } else { 0.0 };
            sphere_cross_section(plane_angle, plane_height, options)
        }
        DiagramType::ThreeDShapes => cube_projection(30.0, 45.0, 0.0, options),
        DiagramType::Patterns => {
            if lower.contains("tessellation") || lower.contains("tile") {
                tessellation(options)
            } else if lower.contains("fractal") || lower.contains("triangle") {
                fractal(4, options)
            } else {
                symmetry(8, options)
            }
        }
        DiagramType::Matrix => {
            let (rows, cols) = parse_grid_size(&lower).unwrap_or((3, 3));
            matrix_grid(rows, cols, options)
        }
        DiagramType::Geometric => symmetry(8, options),
    }
}

/// Sphere cross-section: outline circle plus the cutting-plane ellipse.
pub fn sphere_cross_section(plane_angle: f64, plane_height: f64, options: &RenderOptions) -> String {
    let (cx, cy) = options.center();
    let radius = options.width.min(options.height) as f64 * 0.4;
    let angle_rad = plane_angle.to_radians();

    // Radius of the circle cut out by a plane at the given height
    let section_radius = (radius * radius - (plane_height * radius).powi(2))
        .max(0.0)
        .sqrt();
    let section_cy = cy - plane_height * radius * angle_rad.sin();

    let mut elements = vec![
        options.background(),
        SvgElement::new("circle")
            .attr("cx", cx)
            .attr("cy", cy)
            .attr("r", radius)
            .attr("stroke", &options.stroke_color)
            .attr("stroke-width", options.stroke_width)
            .attr("fill", "none")
            .attr("opacity", 0.3),
        SvgElement::new("ellipse")
            .attr("cx", cx)
            .attr("cy", section_cy)
            .attr("rx", section_radius)
            .attr("ry", section_radius * angle_rad.cos())
            .attr("stroke", &options.stroke_color)
            .attr("stroke-width", options.stroke_width * 1.5)
            .attr("fill", "#e0e0e0")
            .attr("opacity", 0.8),
        SvgElement::new("circle")
            .attr("cx", cx)
            .attr("cy", section_cy)
            .attr("r", 3)
            .attr("fill", &options.stroke_color),
    ];

    if options.style == RenderStyle::Detailed {
        for (x1, y1, x2, y2) in [
            (cx, cy - radius, cx, cy + radius),
            (cx - radius, cy, cx + radius, cy),
        ] {
            elements.push(
                SvgElement::new("line")
                    .attr("x1", x1)
                    .attr("y1", y1)
                    .attr("x2", x2)
                    .attr("y2", y2)
                    .attr("stroke", &options.stroke_color)
                    .attr("stroke-width", 1)
                    .attr("stroke-dasharray", "5,5")
                    .attr("opacity", 0.3),
            );
        }
    }

    render_document(options.width, options.height, &elements)
}

/// Cube wireframe: 3-axis rotation, perspective divide, depth-scaled opacity.
pub fn cube_projection(
    rotation_x: f64,
    rotation_y: f64,
    rotation_z: f64,
    options: &RenderOptions,
) -> String {
    let (cx, cy) = options.center();
    let size = options.width.min(options.height) as f64 * 0.3;

    let vertices: Vec<[f64; 3]> = [
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ]
    .iter()
    .map(|v| rotate_3d([v[0] * size, v[1] * size, v[2] * size], rotation_x, rotation_y, rotation_z))
    .collect();

    let projected: Vec<(f64, f64)> = vertices
        .iter()
        .map(|v| {
            let perspective = 1.0 / (1.0 + v[2] / (size * 4.0));
            (cx + v[0] * perspective, cy - v[1] * perspective)
        })
        .collect();

    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    let mut elements = vec![options.background()];
    for (start, end) in EDGES {
        let depth = (vertices[start][2] + vertices[end][2]) / 2.0;
        let opacity = 0.3 + 0.7 * (1.0 - (depth + size) / (2.0 * size));
        elements.push(
            SvgElement::new("line")
                .attr("x1", projected[start].0)
                .attr("y1", projected[start].1)
                .attr("x2", projected[end].0)
                .attr("y2", projected[end].1)
                .attr("stroke", &options.stroke_color)
                .attr("stroke-width", options.stroke_width)
                .attr("opacity", opacity),
        );
    }

    if options.style == RenderStyle::Detailed {
        for (i, (x, y)) in projected.iter().enumerate() {
            let opacity = 0.3 + 0.7 * (1.0 - (vertices[i][2] + size) / (2.0 * size));
            elements.push(
                SvgElement::new("circle")
                    .attr("cx", *x)
                    .attr("cy", *y)
                    .attr("r", 3)
                    .attr("fill", &options.stroke_color)
                    .attr("opacity", opacity),
            );
        }
    }

    render_document(options.width, options.height, &elements)
}

/// Hexagonal tiling covering the full canvas.
pub fn tessellation(options: &RenderOptions) -> String {
    let hex_size = 30.0;
    let rows = (options.height as f64 / (hex_size * 3f64.sqrt())).ceil() as u32;
    let cols = (options.width as f64 / (hex_size * 1.5)).ceil() as u32;

    let mut elements = vec![options.background()];
    for row in 0..rows {
        for col in 0..cols {
            let x = col as f64 * hex_size * 1.5 + hex_size;
            let y = row as f64 * hex_size * 3f64.sqrt()
                + (col % 2) as f64 * hex_size * 3f64.sqrt() / 2.0
                + hex_size;
            elements.push(hexagon(x, y, hex_size * 0.9, options));
        }
    }

    render_document(options.width, options.height, &elements)
}

/// Sierpinski triangle with the given recursion depth.
pub fn fractal(iterations: u32, options: &RenderOptions) -> String {
    let (cx, cy) = options.center();
    let size = options.width.min(options.height) as f64 * 0.8;

    let mut elements = vec![options.background()];
    sierpinski(cx, cy, size, iterations, options, &mut elements);
    render_document(options.width, options.height, &elements)
}

fn sierpinski(
    x: f64,
    y: f64,
    size: f64,
    depth: u32,
    options: &RenderOptions,
    elements: &mut Vec<SvgElement>,
) {
    if depth == 0 {
        elements.push(
            SvgElement::new("polygon")
                .attr(
                    "points",
                    format!(
                        "{},{} {},{} {},{}",
                        x,
                        y - size / 2.0,
                        x - size / 2.0,
                        y + size / 2.0,
                        x + size / 2.0,
                        y + size / 2.0
                    ),
                )
                .attr("fill", &options.stroke_color)
                .attr("stroke", "none"),
        );
        return;
    }
    let half = size / 2.0;
    sierpinski(x, y - half / 2.0, half, depth - 1, options, elements);
    sierpinski(x - half / 2.0, y + half / 2.0, half, depth - 1, options, elements);
    sierpinski(x + half / 2.0, y + half / 2.0, half, depth - 1, options, elements);
}

/// Radial pattern with n-fold symmetry. This is the default diagram.
pub fn symmetry(fold: u32, options: &RenderOptions) -> String {
    let (cx, cy) = options.center();
    let radius = options.width.min(options.height) as f64 * 0.4;
    let fold = fold.max(1);

    let mut elements = vec![options.background()];
    for i in 0..fold {
        let angle = (i as f64 * 360.0 / fold as f64).to_radians();
        let (x1, y1) = (cx + radius * 0.3 * angle.cos(), cy + radius * 0.3 * angle.sin());
        let (x2, y2) = (cx + radius * 0.8 * angle.cos(), cy + radius * 0.8 * angle.sin());
        elements.push(
            SvgElement::new("line")
                .attr("x1", x1)
                .attr("y1", y1)
                .attr("x2", x2)
                .attr("y2", y2)
                .attr("stroke", &options.stroke_color)
                .attr("stroke-width", options.stroke_width),
        );
        elements.push(
            SvgElement::new("circle")
                .attr("cx", x2)
                .attr("cy", y2)
                .attr("r", 5)
                .attr("fill", &options.stroke_color),
        );
    }
    elements.push(
        SvgElement::new("circle")
            .attr("cx", cx)
            .attr("cy", cy)
            .attr("r", radius * 0.2)
            .attr("stroke", &options.stroke_color)
            .attr("stroke-width", options.stroke_width)
            .attr("fill", "none"),
    );

    render_document(options.width, options.height, &elements)
}

/// N×N grid of alternating shapes with the bottom-right cell left as `?`,
/// matching the missing-element convention of matrix questions.
pub fn matrix_grid(rows: u32, cols: u32, options: &RenderOptions) -> String {
    let rows = rows.clamp(2, 8);
    let cols = cols.clamp(2, 8);
    let cell_w = options.width as f64 / (cols + 1) as f64;
    let cell_h = options.height as f64 / (rows + 1) as f64;
    let margin = cell_w.min(cell_h) * 0.1;

    let mut elements = vec![options.background()];
    for row in 0..rows {
        for col in 0..cols {
            let x = (col as f64 + 1.0) * cell_w;
            let y = (row as f64 + 1.0) * cell_h;
            let inner_w = cell_w - 2.0 * margin;
            let inner_h = cell_h - 2.0 * margin;

            elements.push(
                SvgElement::new("rect")
                    .attr("x", x - inner_w / 2.0)
                    .attr("y", y - inner_h / 2.0)
                    .attr("width", inner_w)
                    .attr("height", inner_h)
                    .attr("stroke", &options.stroke_color)
                    .attr("stroke-width", options.stroke_width)
                    .attr("fill", "none"),
            );

            if row == rows - 1 && col == cols - 1 {
                elements.push(
                    SvgElement::new("text")
                        .attr("x", x)
                        .attr("y", y + inner_h * 0.2)
                        .attr("text-anchor", "middle")
                        .attr("font-size", (inner_h * 0.6).round())
                        .attr("font-weight", "bold")
                        .text("?"),
                );
            } else {
                elements.push(cell_shape((row + col) % 3, x, y, inner_w, inner_h, options));
            }
        }
    }

    render_document(options.width, options.height, &elements)
}

fn cell_shape(
    index: u32,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    options: &RenderOptions,
) -> SvgElement {
    match index {
        0 => SvgElement::new("circle")
            .attr("cx", x)
            .attr("cy", y)
            .attr("r", width.min(height) * 0.35)
            .attr("stroke", &options.stroke_color)
            .attr("stroke-width", options.stroke_width)
            .attr("fill", &options.fill_color),
        1 => SvgElement::new("rect")
            .attr("x", x - width * 0.35)
            .attr("y", y - height * 0.35)
            .attr("width", width * 0.7)
            .attr("height", height * 0.7)
            .attr("stroke", &options.stroke_color)
            .attr("stroke-width", options.stroke_width)
            .attr("fill", &options.fill_color),
        _ => SvgElement::new("polygon")
            .attr(
                "points",
                format!(
                    "{},{} {},{} {},{}",
                    x,
                    y - height * 0.35,
                    x - width * 0.35,
                    y + height * 0.35,
                    x + width * 0.35,
                    y + height * 0.35
                ),
            )
            .attr("stroke", &options.stroke_color)
            .attr("stroke-width", options.stroke_width)
            .attr("fill", &options.fill_color),
    }
}

fn hexagon(x: f64, y: f64, size: f64, options: &RenderOptions) -> SvgElement {
    let points: Vec<String> = (0..6)
        .map(|i| {
            let angle = ((i * 60 - 30) as f64).to_radians();
            format!("{},{}", x + size * angle.cos(), y + size * angle.sin())
        })
        .collect();
    SvgElement::new("polygon")
        .attr("points", points.join(" "))
        .attr("stroke", &options.stroke_color)
        .attr("stroke-width", options.stroke_width)
        .attr("fill", "none")
}

/// Three-axis rotation applied X, then Y, then Z.
fn rotate_3d(vertex: [f64; 3], angle_x: f64, angle_y: f64, angle_z: f64) -> [f64; 3] {
    let (rx, ry, rz) = (angle_x.to_radians(), angle_y.to_radians(), angle_z.to_radians());
    let [mut x, mut y, mut z] = vertex;

    let (y1, z1) = (y * rx.cos() - z * rx.sin(), y * rx.sin() + z * rx.cos());
    y = y1;
    z = z1;

    let (x2, z2) = (x * ry.cos() + z * ry.sin(), -x * ry.sin() + z * ry.cos());
    x = x2;
    z = z2;

    let (x3, y3) = (x * rz.cos() - y * rz.sin(), x * rz.sin() + y * rz.cos());
    [x3, y3, z]
}

/// Extract an `NxM` grid size like `3x3` from a lowercased description.
fn parse_grid_size(description: &str) -> Option<(u32, u32)> {
    for separator in ['x', '×'] {
        if let Some(pos) = description.find(separator) {
            let before: String = description[..pos]
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .chars()
                .rev()
                .collect();
            let after: String = description[pos + separator.len_utf8()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let (Ok(rows), Ok(cols)) = (before.parse(), after.parse()) {
                return Some((rows, cols));
            }
        }
    }
    None
}
