//! The geometry: meshes, domains and the global numbering of unknowns
use crate::geometry::{Domain, Mesh};
use crate::kernels::solid_angle;
use crate::types::{DomainId, Error, MeshId, Point, Result};
use log::debug;
use std::f64::consts::PI;

/// Two meshes sharing a conductive domain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshPair {
    mesh1: MeshId,
    mesh2: MeshId,
    orientation: i32,
}

impl MeshPair {
    /// First mesh
    pub fn mesh1(&self) -> MeshId {
        self.mesh1
    }

    /// Second mesh
    pub fn mesh2(&self) -> MeshId {
        self.mesh2
    }

    /// Product of the orientations of the two meshes as seen from their common domain
    pub fn relative_orientation(&self) -> i32 {
        self.orientation
    }
}

/// A piecewise homogeneous conductor bounded by closed meshes
#[derive(Debug)]
pub struct Geometry {
    meshes: Vec<Mesh>,
    domains: Vec<Domain>,
    pairs: Vec<MeshPair>,
    isolated_parts: Vec<Vec<MeshId>>,
    nb_parameters: usize,
    nb_current_barrier_triangles: usize,
}

impl Geometry {
    /// Create a geometry
    ///
    /// Meshes bounding a domain of zero conductivity are flagged as current barriers. Vertices
    /// are numbered first, mesh by mesh, followed by the triangles of the meshes that are not
    /// current barriers and finally by the triangles of the current barriers.
    pub fn new(mut meshes: Vec<Mesh>, domains: Vec<Domain>) -> Result<Self> {
        for domain in &domains {
            if let Some(m) = domain.meshes().find(|m| *m >= meshes.len()) {
                return Err(Error::InvalidMesh(format!(
                    "domain {} references missing mesh {m}",
                    domain.name()
                )));
            }
        }

        for mesh in meshes.iter_mut() {
            mesh.set_current_barrier(false);
        }
        for domain in domains.iter().filter(|d| !d.is_conductive()) {
            for m in domain.meshes() {
                meshes[m].set_current_barrier(true);
            }
        }

        let mut vertex_offsets = Vec::with_capacity(meshes.len());
        let mut index = 0;
        for mesh in &meshes {
            vertex_offsets.push(index);
            index += mesh.nvertices();
        }
        let mut triangle_offsets = vec![0; meshes.len()];
        for barrier in [false, true] {
            for (m, mesh) in meshes.iter().enumerate() {
                if mesh.current_barrier() == barrier {
                    triangle_offsets[m] = index;
                    index += mesh.ntriangles();
                }
            }
        }
        let nb_parameters = index;
        for (m, mesh) in meshes.iter_mut().enumerate() {
            mesh.set_offsets(vertex_offsets[m], triangle_offsets[m]);
        }
        let nb_current_barrier_triangles = meshes
            .iter()
            .filter(|m| m.current_barrier())
            .map(|m| m.ntriangles())
            .sum();

        let mut geometry = Self {
            meshes,
            domains,
            pairs: vec![],
            isolated_parts: vec![],
            nb_parameters,
            nb_current_barrier_triangles,
        };
        geometry.pairs = geometry.find_communicating_pairs();
        geometry.isolated_parts = geometry.find_isolated_parts();

        debug!(
            "Geometry with {} meshes, {} domains, {} parameters ({} barrier triangles)",
            geometry.meshes.len(),
            geometry.domains.len(),
            geometry.nb_parameters,
            geometry.nb_current_barrier_triangles
        );

        Ok(geometry)
    }

    fn common_conductive_domains(
        &self,
        m1: MeshId,
        m2: MeshId,
    ) -> impl Iterator<Item = &Domain> + '_ {
        self.domains.iter().filter(move |d| {
            d.is_conductive() && d.mesh_orientation(m1) != 0 && d.mesh_orientation(m2) != 0
        })
    }

    fn find_communicating_pairs(&self) -> Vec<MeshPair> {
        let mut pairs = vec![];
        for mesh1 in 0..self.meshes.len() {
            for mesh2 in mesh1..self.meshes.len() {
                if let Some(domain) = self.common_conductive_domains(mesh1, mesh2).next() {
                    pairs.push(MeshPair {
                        mesh1,
                        mesh2,
                        orientation: domain.mesh_orientation(mesh1) * domain.mesh_orientation(mesh2),
                    });
                }
            }
        }
        pairs
    }

    fn find_isolated_parts(&self) -> Vec<Vec<MeshId>> {
        let mut component: Vec<usize> = (0..self.meshes.len()).collect();
        fn root(component: &mut [usize], mut m: usize) -> usize {
            while component[m] != m {
                component[m] = component[component[m]];
                m = component[m];
            }
            m
        }
        for domain in self.domains.iter().filter(|d| d.is_conductive()) {
            let meshes = domain.meshes().collect::<Vec<_>>();
            for pair in meshes.windows(2) {
                let r0 = root(&mut component, pair[0]);
                let r1 = root(&mut component, pair[1]);
                if r0 != r1 {
                    component[r0.max(r1)] = r0.min(r1);
                }
            }
        }

        let mut parts: Vec<Vec<MeshId>> = vec![];
        let mut roots: Vec<usize> = vec![];
        for m in 0..self.meshes.len() {
            let r = root(&mut component, m);
            match roots.iter().position(|x| *x == r) {
                Some(p) => parts[p].push(m),
                None => {
                    roots.push(r);
                    parts.push(vec![m]);
                }
            }
        }
        parts
            .into_iter()
            .filter(|part| part.iter().any(|m| self.meshes[*m].outermost()))
            .collect()
    }

    /// Meshes
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// A mesh
    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id]
    }

    /// Find a mesh by name
    pub fn mesh_by_name(&self, name: &str) -> Option<MeshId> {
        self.meshes.iter().position(|m| m.name() == name)
    }

    /// Domains
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// A domain
    pub fn domain(&self, id: DomainId) -> &Domain {
        &self.domains[id]
    }

    /// Find a domain by name
    pub fn domain_by_name(&self, name: &str) -> Result<DomainId> {
        self.domains
            .iter()
            .position(|d| d.name() == name)
            .ok_or_else(|| Error::UnknownDomain(name.to_string()))
    }

    /// Is a point enclosed by all the boundaries of a domain that have it inside?
    pub fn is_inside(&self, domain: DomainId, point: &Point) -> bool {
        self.domains[domain].boundaries().iter().all(|boundary| {
            let omega: f64 = boundary
                .interface()
                .oriented_meshes()
                .iter()
                .map(|om| {
                    let mesh = &self.meshes[om.mesh()];
                    f64::from(om.orientation())
                        * mesh
                            .triangles()
                            .iter()
                            .map(|t| solid_angle(point, t.points()))
                            .sum::<f64>()
                })
                .sum();
            (omega.abs() > 2.0 * PI) == boundary.inside()
        })
    }

    /// The domain containing a point
    pub fn domain_of(&self, point: &Point) -> Option<DomainId> {
        (0..self.domains.len()).find(|d| self.is_inside(*d, point))
    }

    /// Pairs of meshes sharing a conductive domain, with `mesh1 <= mesh2`
    pub fn communicating_mesh_pairs(&self) -> &[MeshPair] {
        &self.pairs
    }

    /// Relative orientation of two meshes, or 0 if they do not communicate
    pub fn oriented(&self, mesh1: MeshId, mesh2: MeshId) -> i32 {
        let (m1, m2) = (mesh1.min(mesh2), mesh1.max(mesh2));
        self.pairs
            .iter()
            .find(|p| p.mesh1 == m1 && p.mesh2 == m2)
            .map_or(0, |p| p.orientation)
    }

    /// Sum of the conductivities of the conductive domains bounded by both meshes
    pub fn sigma(&self, mesh1: MeshId, mesh2: MeshId) -> f64 {
        self.common_conductive_domains(mesh1, mesh2)
            .map(|d| d.conductivity())
            .sum()
    }

    /// Sum of the inverse conductivities of the conductive domains bounded by both meshes
    pub fn sigma_inv(&self, mesh1: MeshId, mesh2: MeshId) -> f64 {
        self.common_conductive_domains(mesh1, mesh2)
            .map(|d| 1.0 / d.conductivity())
            .sum()
    }

    /// Number of conductive domains bounded by both meshes
    pub fn indicator(&self, mesh1: MeshId, mesh2: MeshId) -> f64 {
        self.common_conductive_domains(mesh1, mesh2).count() as f64
    }

    /// Groups of meshes connected through conductive domains that contain an outermost mesh
    pub fn isolated_parts(&self) -> &[Vec<MeshId>] {
        &self.isolated_parts
    }

    /// Number of vertices and triangles
    pub fn nb_parameters(&self) -> usize {
        self.nb_parameters
    }

    /// Number of triangles on current barriers
    pub fn nb_current_barrier_triangles(&self) -> usize {
        self.nb_current_barrier_triangles
    }

    /// Dimension of the head matrix
    pub fn size(&self) -> usize {
        self.nb_parameters - self.nb_current_barrier_triangles
    }

    /// Number of vertices
    pub fn nb_vertices(&self) -> usize {
        self.meshes.iter().map(|m| m.nvertices()).sum()
    }

    /// Number of triangles
    pub fn nb_triangles(&self) -> usize {
        self.meshes.iter().map(|m| m.ntriangles()).sum()
    }

    /// Check that a mesh lies inside a single domain and return that domain
    pub fn check_source_mesh(&self, mesh: &Mesh) -> Result<DomainId> {
        let overlapping = || Error::OverlappingSourceMesh(mesh.name().to_string());
        let first = mesh.points().first().ok_or_else(overlapping)?;
        let domain = self.domain_of(first).ok_or_else(overlapping)?;
        if mesh.points().iter().all(|p| self.is_inside(domain, p)) {
            Ok(domain)
        } else {
            Err(overlapping())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::shapes::regular_sphere;
    use crate::geometry::{Boundary, Interface};

    /// Two nested spheres in air
    fn two_shells(air: f64) -> Geometry {
        let inner = regular_sphere("inner", 1, 0.5, [0.0, 0.0, 0.0]).unwrap();
        let outer = regular_sphere("outer", 1, 1.0, [0.0, 0.0, 0.0]).unwrap();
        let i0 = Interface::from_mesh("i0", 0);
        let i1 = Interface::from_mesh("i1", 1);
        let domains = vec![
            Domain::new("core", 1.0, vec![Boundary::new(i0.clone(), true)]),
            Domain::new(
                "shell",
                0.25,
                vec![Boundary::new(i0, false), Boundary::new(i1.clone(), true)],
            ),
            Domain::new("air", air, vec![Boundary::new(i1, false)]),
        ];
        Geometry::new(vec![inner, outer], domains).unwrap()
    }

    #[test]
    fn test_numbering_with_barrier() {
        let geo = two_shells(0.0);
        assert!(!geo.mesh(0).current_barrier());
        assert!(geo.mesh(1).current_barrier());
        assert!(geo.mesh(1).outermost());
        assert_eq!(geo.nb_parameters(), 18 + 18 + 32 + 32);
        assert_eq!(geo.nb_current_barrier_triangles(), 32);
        assert_eq!(geo.size(), 68);
        assert_eq!(geo.mesh(0).vertex_range(), 0..18);
        assert_eq!(geo.mesh(1).vertex_range(), 18..36);
        assert_eq!(geo.mesh(0).triangle_range(), 36..68);
        assert_eq!(geo.mesh(1).triangle_range(), 68..100);
        assert_eq!(geo.isolated_parts(), &[vec![0, 1]]);
    }

    #[test]
    fn test_pairs_and_coefficients() {
        let geo = two_shells(0.0);
        let pairs = geo.communicating_mesh_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].relative_orientation(), 1);
        assert_eq!((pairs[1].mesh1(), pairs[1].mesh2()), (0, 1));
        assert_eq!(pairs[1].relative_orientation(), -1);
        assert_eq!(geo.sigma(0, 0), 1.25);
        assert_eq!(geo.sigma_inv(0, 0), 5.0);
        assert_eq!(geo.indicator(0, 0), 2.0);
        assert_eq!(geo.sigma(0, 1), 0.25);
        assert_eq!(geo.indicator(1, 1), 1.0);
        assert_eq!(geo.oriented(1, 0), -1);
    }

    #[test]
    fn test_no_barrier() {
        let geo = two_shells(0.1);
        assert_eq!(geo.nb_current_barrier_triangles(), 0);
        assert_eq!(geo.size(), 100);
        assert!(geo.isolated_parts().is_empty());
    }

    #[test]
    fn test_domain_of() {
        let geo = two_shells(0.0);
        assert_eq!(geo.domain_of(&[0.0, 0.1, 0.0]), Some(0));
        assert_eq!(geo.domain_of(&[0.0, 0.0, 0.75]), Some(1));
        assert_eq!(geo.domain_of(&[2.0, 0.0, 0.0]), Some(2));
        assert!(matches!(
            geo.domain_by_name("skull"),
            Err(Error::UnknownDomain(_))
        ));
    }
}
