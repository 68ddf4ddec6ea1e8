use serde::{Deserialize, Serialize};

use opencarta_core::ring::PolygonRing;
use opencarta_core::scene::Scene;
use opencarta_core::shape::{Shape, ShapeId};
use opencarta_core::viewport::Viewport;

/// A single path instruction for the drawing surface. Coordinates are map
/// units; the surface applies the frame's viewport transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    ClosePath,
}

/// Draw data for one shape: outline commands for its rings and holes,
/// plus one fill and one stroke request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderShape {
    pub id: ShapeId,
    pub commands: Vec<PathCommand>,
    pub fill: [f32; 4],   // RGBA
    pub stroke: [f32; 4], // RGBA
    pub stroke_width: f64,
}

/// Shapes to repaint for one layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderLayer {
    pub name: String,
    pub shapes: Vec<RenderShape>,
}

/// One frame of draw instructions for the surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    /// True when the surface must be cleared and repainted from scratch.
    pub clear_surface: bool,
    pub layers: Vec<RenderLayer>,
    pub viewport: Viewport,
}

impl RenderFrame {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            clear_surface: false,
            layers: Vec::new(),
            viewport,
        }
    }
}

/// Build the draw instructions for one frame.
///
/// A pending full redraw refreshes every shape's visibility, emits all
/// visible shapes, and asks the surface to clear first. Otherwise only
/// dirty visible shapes are emitted over the existing paint. Emitted and
/// offscreen shapes come out clean; the scene's full-redraw flag is
/// acknowledged at the end of the pass.
pub fn build_frame(scene: &mut Scene) -> RenderFrame {
    let viewport = *scene.viewport();
    if !scene.needs_redraw() {
        return RenderFrame::empty(viewport);
    }
    let force = scene.force_redraw();
    let mut layers = Vec::new();
    let mut culled = 0usize;
    for layer in scene.layers_mut() {
        if layer.is_hidden() {
            continue;
        }
        let mut shapes = Vec::new();
        for shape in layer.shapes_mut() {
            if !shape.update_visibility(&viewport) {
                // Offscreen shapes paint nothing, so their dirt is moot.
                shape.clear_dirty();
                culled += 1;
                continue;
            }
            if !force && !shape.is_dirty() {
                continue;
            }
            shapes.push(render_shape(shape));
            shape.clear_dirty();
        }
        if !shapes.is_empty() {
            layers.push(RenderLayer {
                name: layer.name().to_string(),
                shapes,
            });
        }
    }
    scene.finish_redraw();
    log::debug!(
        "frame: {} shapes across {} layers, {} culled, clear={}",
        layers.iter().map(|l| l.shapes.len()).sum::<usize>(),
        layers.len(),
        culled,
        force
    );
    RenderFrame {
        clear_surface: force,
        layers,
        viewport,
    }
}

fn render_shape(shape: &Shape) -> RenderShape {
    let mut commands = Vec::new();
    for ring in shape.rings() {
        emit_ring(&mut commands, ring);
        for hole in ring.holes() {
            emit_ring(&mut commands, hole);
        }
    }
    let palette = shape.palette();
    RenderShape {
        id: shape.id(),
        commands,
        fill: shape.fill_color().to_f32_array(1.0),
        stroke: palette.stroke.to_f32_array(1.0),
        stroke_width: palette.stroke_width,
    }
}

fn emit_ring(commands: &mut Vec<PathCommand>, ring: &PolygonRing) {
    let mut points = ring.points().iter();
    if let Some(first) = points.next() {
        commands.push(PathCommand::MoveTo {
            x: first.x,
            y: first.y,
        });
    }
    for p in points {
        commands.push(PathCommand::LineTo { x: p.x, y: p.y });
    }
    commands.push(PathCommand::ClosePath);
}
