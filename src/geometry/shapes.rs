//! Definition of various test shapes.
use crate::geometry::vector::{add, midpoint, norm, scale, sub};
use crate::geometry::{Boundary, Domain, Geometry, Interface, Mesh};
use crate::types::{Error, Point, Result};
use std::collections::HashMap;

/// Create a regular sphere
///
/// A regular sphere is created by starting with a regular octahedron. The shape is then refined `refinement_level` times.
/// Each time the mesh is refined, each triangle is split into four triangles (by adding lines connecting the midpoints of
/// each edge). The new points are then projected onto the sphere of the given `radius` around `center`.
/// The triangles are oriented with outward normals.
pub fn regular_sphere(
    name: &str,
    refinement_level: u32,
    radius: f64,
    center: Point,
) -> Result<Mesh> {
    let mut points = Vec::<Point>::with_capacity(2 + usize::pow(4, refinement_level + 1));

    points.push([0.0, 0.0, 1.0]);
    points.push([1.0, 0.0, 0.0]);
    points.push([0.0, 1.0, 0.0]);
    points.push([-1.0, 0.0, 0.0]);
    points.push([0.0, -1.0, 0.0]);
    points.push([0.0, 0.0, -1.0]);

    let mut cells = vec![
        [0, 1, 2],
        [0, 2, 3],
        [0, 3, 4],
        [0, 4, 1],
        [5, 2, 1],
        [5, 3, 2],
        [5, 4, 3],
        [5, 1, 4],
    ];

    for level in 0..refinement_level {
        let mut edge_points = HashMap::new();
        let mut new_cells = Vec::with_capacity(8 * usize::pow(4, level + 1));
        for c in &cells {
            let edges = [[1, 2], [0, 2], [0, 1]]
                .iter()
                .map(|[i, j]| {
                    let pt_i = c[*i].min(c[*j]);
                    let pt_j = c[*i].max(c[*j]);
                    *edge_points.entry((pt_i, pt_j)).or_insert_with(|| {
                        let new_pt = midpoint(&points[pt_i], &points[pt_j]);
                        points.push(scale(&new_pt, 1.0 / norm(&new_pt)));
                        points.len() - 1
                    })
                })
                .collect::<Vec<_>>();
            new_cells.push([c[0], edges[2], edges[1]]);
            new_cells.push([c[1], edges[0], edges[2]]);
            new_cells.push([c[2], edges[1], edges[0]]);
            new_cells.push([edges[0], edges[1], edges[2]]);
        }
        cells = new_cells;
    }

    let points = points
        .iter()
        .map(|p| add(&scale(p, radius), &center))
        .collect();
    Mesh::new(name, points, &cells)
}

/// Create a geometry of concentric spheres
///
/// `radii` are increasing and `conductivities` lists the conductivity of each domain from the
/// innermost ball to the unbounded outside, so it has one more entry than `radii`. Mesh `i`
/// is the sphere of radius `radii[i]` and domain `i` lies just inside it.
pub fn nested_spheres(
    refinement_level: u32,
    radii: &[f64],
    conductivities: &[f64],
) -> Result<Geometry> {
    if conductivities.len() != radii.len() + 1 {
        return Err(Error::DimensionMismatch {
            expected: [radii.len() + 1, 1],
            found: [conductivities.len(), 1],
        });
    }
    let meshes = radii
        .iter()
        .enumerate()
        .map(|(i, r)| regular_sphere(&format!("sphere{i}"), refinement_level, *r, [0.0; 3]))
        .collect::<Result<Vec<_>>>()?;
    let interfaces = (0..radii.len())
        .map(|i| Interface::from_mesh(&format!("interface{i}"), i))
        .collect::<Vec<_>>();
    let domains = conductivities
        .iter()
        .enumerate()
        .map(|(i, sigma)| {
            let mut boundaries = vec![];
            if i > 0 {
                boundaries.push(Boundary::new(interfaces[i - 1].clone(), false));
            }
            if i < radii.len() {
                boundaries.push(Boundary::new(interfaces[i].clone(), true));
            }
            Domain::new(&format!("domain{i}"), *sigma, boundaries)
        })
        .collect();
    Geometry::new(meshes, domains)
}

/// Create a square mesh with triangle cells
///
/// Create a mesh of the square \[0,1\]^2 in the plane z = 0 with triangle cells. The input ncells is the number of cells
/// along each side of the square.
pub fn screen_triangles(name: &str, ncells: usize) -> Result<Mesh> {
    let n = ncells as f64;
    let mut points = Vec::with_capacity((ncells + 1) * (ncells + 1));
    for y in 0..ncells + 1 {
        for x in 0..ncells + 1 {
            points.push([x as f64 / n, y as f64 / n, 0.0]);
        }
    }
    let mut cells = Vec::with_capacity(2 * ncells * ncells);
    for y in 0..ncells {
        for x in 0..ncells {
            cells.push([
                y * (ncells + 1) + x,
                y * (ncells + 1) + x + 1,
                y * (ncells + 1) + x + ncells + 2,
            ]);
            cells.push([
                y * (ncells + 1) + x,
                y * (ncells + 1) + x + ncells + 2,
                y * (ncells + 1) + x + ncells + 1,
            ]);
        }
    }
    Mesh::new(name, points, &cells)
}

/// Largest distance between the center of a mesh's bounding box and its points
pub fn bounding_radius(mesh: &Mesh) -> f64 {
    let mut lo = [f64::MAX; 3];
    let mut hi = [f64::MIN; 3];
    for p in mesh.points() {
        for i in 0..3 {
            lo[i] = lo[i].min(p[i]);
            hi[i] = hi[i].max(p[i]);
        }
    }
    let center = midpoint(&lo, &hi);
    mesh.points()
        .iter()
        .map(|p| norm(&sub(p, &center)))
        .fold(0.0, f64::max)
}
