//! Triangulated surfaces
use crate::geometry::vector::{cross, norm, scale, sub};
use crate::types::{Error, Point, Result};
use std::ops::Range;

/// A flat triangle of a mesh
#[derive(Clone, Debug)]
pub struct Triangle {
    vertices: [usize; 3],
    points: [Point; 3],
    area: f64,
    normal: Point,
}

impl Triangle {
    fn new(vertices: [usize; 3], points: [Point; 3]) -> Self {
        let n = cross(&sub(&points[1], &points[0]), &sub(&points[2], &points[0]));
        let twice_area = norm(&n);
        Self {
            vertices,
            points,
            area: 0.5 * twice_area,
            normal: if twice_area > 0.0 {
                scale(&n, 1.0 / twice_area)
            } else {
                [0.0, 0.0, 0.0]
            },
        }
    }

    /// Local indices (in the owning mesh) of the three vertices
    pub fn vertices(&self) -> &[usize; 3] {
        &self.vertices
    }

    /// Coordinates of the three vertices
    pub fn points(&self) -> &[Point; 3] {
        &self.points
    }

    /// Area
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Unit normal, oriented by the vertex order
    pub fn normal(&self) -> &Point {
        &self.normal
    }

    /// Position (0, 1 or 2) of a local vertex in this triangle
    pub fn position(&self, vertex: usize) -> Option<usize> {
        self.vertices.iter().position(|v| *v == vertex)
    }

    /// The edge vector opposite to the vertex at `position`
    pub fn opposite_edge(&self, position: usize) -> Point {
        sub(
            &self.points[(position + 1) % 3],
            &self.points[(position + 2) % 3],
        )
    }
}

/// A closed triangulated surface
///
/// Vertices and triangles are numbered locally from zero. The global unknown indices are
/// obtained by shifting the local numbers by the offsets assigned by the
/// [Geometry](crate::geometry::Geometry).
#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    points: Vec<Point>,
    triangles: Vec<Triangle>,
    incident: Vec<Vec<usize>>,
    vertex_offset: usize,
    triangle_offset: usize,
    current_barrier: bool,
    outermost: bool,
}

impl Mesh {
    /// Create a mesh from its points and triangles
    ///
    /// Every triangle must reference existing points and have a non-zero area.
    pub fn new(name: &str, points: Vec<Point>, cells: &[[usize; 3]]) -> Result<Self> {
        if cells.is_empty() {
            return Err(Error::InvalidMesh(format!("mesh {name} has no triangles")));
        }
        let mut triangles = Vec::with_capacity(cells.len());
        let mut incident = vec![vec![]; points.len()];
        for (t, cell) in cells.iter().enumerate() {
            if let Some(v) = cell.iter().find(|v| **v >= points.len()) {
                return Err(Error::InvalidMesh(format!(
                    "triangle {t} of mesh {name} references missing vertex {v}"
                )));
            }
            let triangle = Triangle::new(*cell, [points[cell[0]], points[cell[1]], points[cell[2]]]);
            if triangle.area() <= 0.0 {
                return Err(Error::InvalidMesh(format!(
                    "triangle {t} of mesh {name} is degenerate"
                )));
            }
            for v in cell {
                incident[*v].push(t);
            }
            triangles.push(triangle);
        }
        let nvertices = points.len();
        Ok(Self {
            name: name.to_string(),
            points,
            triangles,
            incident,
            vertex_offset: 0,
            triangle_offset: nvertices,
            current_barrier: false,
            outermost: false,
        })
    }

    /// Name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vertex coordinates
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Triangles
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of vertices
    pub fn nvertices(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles
    pub fn ntriangles(&self) -> usize {
        self.triangles.len()
    }

    /// Local indices of the triangles incident to a local vertex
    pub fn incident_triangles(&self, vertex: usize) -> &[usize] {
        &self.incident[vertex]
    }

    /// Global index of a local vertex
    pub fn vertex_index(&self, vertex: usize) -> usize {
        self.vertex_offset + vertex
    }

    /// Global index of a local triangle
    pub fn triangle_index(&self, triangle: usize) -> usize {
        self.triangle_offset + triangle
    }

    /// Global indices of the vertices
    pub fn vertex_range(&self) -> Range<usize> {
        self.vertex_offset..self.vertex_offset + self.nvertices()
    }

    /// Global indices of the triangles
    pub fn triangle_range(&self) -> Range<usize> {
        self.triangle_offset..self.triangle_offset + self.ntriangles()
    }

    /// Is this mesh impermeable to current?
    pub fn current_barrier(&self) -> bool {
        self.current_barrier
    }

    /// Is this mesh on the outside of an isolated conductor?
    pub fn outermost(&self) -> bool {
        self.outermost
    }

    /// Flag this mesh as an impermeable outer boundary
    pub fn set_current_barrier(&mut self, barrier: bool) {
        self.current_barrier = barrier;
        self.outermost = barrier;
    }

    /// Set the offsets of the global vertex and triangle indices
    pub fn set_offsets(&mut self, vertex_offset: usize, triangle_offset: usize) {
        self.vertex_offset = vertex_offset;
        self.triangle_offset = triangle_offset;
    }

    /// Number the vertices from zero, followed by the triangles
    ///
    /// This is the numbering of a mesh that does not belong to a geometry.
    pub fn index_standalone(&mut self) {
        self.set_offsets(0, self.nvertices());
    }

    /// Total area
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(|t| t.area()).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;

    fn tetrahedron() -> Mesh {
        Mesh::new(
            "tet",
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_tetrahedron() {
        let mesh = tetrahedron();
        assert_eq!(mesh.nvertices(), 4);
        assert_eq!(mesh.ntriangles(), 4);
        assert_eq!(mesh.incident_triangles(0), &[0, 1, 2]);
        assert_relative_eq!(
            mesh.area(),
            1.5 + 0.5 * 3.0_f64.sqrt(),
            max_relative = 1e-14
        );
        assert_relative_eq!(mesh.triangles()[0].normal()[2], -1.0, max_relative = 1e-14);
        assert_eq!(mesh.vertex_range(), 0..4);
        assert_eq!(mesh.triangle_range(), 4..8);
    }

    #[test]
    fn test_opposite_edge() {
        let mesh = tetrahedron();
        let t = &mesh.triangles()[3];
        let p = t.position(2).unwrap();
        assert_eq!(p, 1);
        let e = t.opposite_edge(p);
        assert_eq!(e, [-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_invalid_mesh() {
        let err = Mesh::new("bad", vec![[0.0; 3], [1.0, 0.0, 0.0]], &[[0, 1, 2]]);
        assert!(matches!(err, Err(Error::InvalidMesh(_))));
        let err = Mesh::new(
            "flat",
            vec![[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            &[[0, 1, 2]],
        );
        assert!(matches!(err, Err(Error::InvalidMesh(_))));
    }
}
