/// Static geometry for the extruded letter
use nalgebra::Point3;

/// A vertex with position and an 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: [u8; 3],
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, color: [u8; 3]) -> Self {
        Self {
            position: Point3::new(x, y, z),
            color,
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Faces are flat shaded, so the first vertex speaks for the triangle
    pub fn color(&self) -> [u8; 3] {
        self.vertices[0].color
    }
}

const RED: [u8; 3] = [200, 70, 120];
const DARK_PURPLE: [u8; 3] = [80, 70, 200];
const LIGHTER_BLUE: [u8; 3] = [70, 200, 210];
const YELLOW: [u8; 3] = [200, 200, 70];
const ORANGE: [u8; 3] = [210, 100, 70];
const AMBER: [u8; 3] = [210, 160, 70];
const LIGHT_BLUE: [u8; 3] = [70, 180, 210];
const GREEN: [u8; 3] = [76, 210, 100];
const LIGHT_GREEN: [u8; 3] = [140, 210, 80];
const DARK_GREEN: [u8; 3] = [90, 130, 110];

/// One rectangular face: six corners (two triangles) and a color.
/// Corner order fixes the winding used for back-face culling.
type Face = ([[f32; 3]; 6], [u8; 3]);

/// A letter "A" with a flat top: two columns 30 wide and 150 tall, 130
/// wide overall, a top rung (y 0..30) and a middle rung (y 60..90), 30 deep.
const LETTER_A: [Face; 20] = [
    // left column front
    ([[0., 0., 0.], [0., 150., 0.], [30., 0., 0.], [0., 150., 0.], [30., 150., 0.], [30., 0., 0.]], RED),
    // right column front
    ([[100., 0., 0.], [100., 150., 0.], [130., 0., 0.], [100., 150., 0.], [130., 150., 0.], [130., 0., 0.]], RED),
    // top rung front
    ([[30., 0., 0.], [30., 30., 0.], [100., 0., 0.], [30., 30., 0.], [100., 30., 0.], [100., 0., 0.]], RED),
    // middle rung front
    ([[30., 60., 0.], [30., 90., 0.], [100., 60., 0.], [30., 90., 0.], [100., 90., 0.], [100., 60., 0.]], RED),
    // left column back
    ([[0., 0., 30.], [30., 0., 30.], [0., 150., 30.], [0., 150., 30.], [30., 0., 30.], [30., 150., 30.]], DARK_PURPLE),
    // right column back
    ([[100., 0., 30.], [130., 0., 30.], [100., 150., 30.], [100., 150., 30.], [130., 0., 30.], [130., 150., 30.]], DARK_PURPLE),
    // top rung back
    ([[30., 0., 30.], [100., 0., 30.], [30., 30., 30.], [30., 30., 30.], [100., 0., 30.], [100., 30., 30.]], DARK_PURPLE),
    // middle rung back
    ([[30., 60., 30.], [100., 60., 30.], [30., 90., 30.], [30., 90., 30.], [100., 60., 30.], [100., 90., 30.]], DARK_PURPLE),
    // top
    ([[0., 0., 0.], [130., 0., 30.], [0., 0., 30.], [0., 0., 0.], [130., 0., 0.], [130., 0., 30.]], LIGHTER_BLUE),
    // right side
    ([[130., 0., 0.], [130., 150., 30.], [130., 0., 30.], [130., 0., 0.], [130., 150., 0.], [130., 150., 30.]], YELLOW),
    // under top rung
    ([[30., 30., 0.], [30., 30., 30.], [100., 30., 30.], [30., 30., 0.], [100., 30., 30.], [100., 30., 0.]], ORANGE),
    // inner right, between the rungs
    ([[100., 30., 0.], [100., 30., 30.], [100., 60., 30.], [100., 30., 0.], [100., 60., 30.], [100., 60., 0.]], AMBER),
    // inner left, between the rungs
    ([[30., 30., 0.], [30., 60., 30.], [30., 30., 30.], [30., 30., 0.], [30., 60., 0.], [30., 60., 30.]], AMBER),
    // top of middle rung
    ([[30., 60., 0.], [100., 60., 30.], [30., 60., 30.], [30., 60., 0.], [100., 60., 0.], [100., 60., 30.]], LIGHT_BLUE),
    // bottom of middle rung
    ([[30., 90., 0.], [30., 90., 30.], [100., 90., 30.], [30., 90., 0.], [100., 90., 30.], [100., 90., 0.]], GREEN),
    // inner right, below the middle rung
    ([[100., 90., 0.], [100., 90., 30.], [100., 150., 30.], [100., 90., 0.], [100., 150., 30.], [100., 150., 0.]], LIGHT_GREEN),
    // inner left, below the middle rung
    ([[30., 90., 0.], [30., 150., 30.], [30., 90., 30.], [30., 90., 0.], [30., 150., 0.], [30., 150., 30.]], LIGHT_GREEN),
    // bottom of left column
    ([[0., 150., 0.], [0., 150., 30.], [30., 150., 30.], [0., 150., 0.], [30., 150., 30.], [30., 150., 0.]], DARK_GREEN),
    // bottom of right column
    ([[100., 150., 0.], [100., 150., 30.], [130., 150., 30.], [100., 150., 0.], [130., 150., 30.], [130., 150., 0.]], DARK_GREEN),
    // left side
    ([[0., 0., 0.], [0., 0., 30.], [0., 150., 30.], [0., 0., 0.], [0., 150., 30.], [0., 150., 0.]], AMBER),
];

/// A triangle mesh, immutable once built
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// The extruded letter drawn by every backend
    pub fn letter_a() -> Self {
        let mut mesh = Self::with_capacity(LETTER_A.len() * 2);
        for (corners, color) in LETTER_A.iter() {
            for tri in corners.chunks_exact(3) {
                let v = |c: &[f32; 3]| Vertex::new(c[0], c[1], c[2], *color);
                mesh.add_triangle(Triangle::new(v(&tri[0]), v(&tri[1]), v(&tri[2])));
            }
        }
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Flat `x, y, z` positions for a vertex buffer
    pub fn positions(&self) -> Vec<f32> {
        self.vertices()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Flat `r, g, b` bytes for a color buffer
    pub fn colors(&self) -> Vec<u8> {
        self.vertices().flat_map(|v| v.color).collect()
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
