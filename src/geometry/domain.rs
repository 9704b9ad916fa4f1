//! Domains of constant conductivity and the interfaces bounding them
use crate::types::MeshId;

/// A mesh taken with an orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrientedMesh {
    mesh: MeshId,
    orientation: i32,
}

impl OrientedMesh {
    /// Create an oriented mesh; `reversed` flips the mesh normals
    pub fn new(mesh: MeshId, reversed: bool) -> Self {
        Self {
            mesh,
            orientation: if reversed { -1 } else { 1 },
        }
    }

    /// The mesh
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// +1 or -1
    pub fn orientation(&self) -> i32 {
        self.orientation
    }
}

/// A closed surface made of one or more oriented meshes
#[derive(Clone, Debug)]
pub struct Interface {
    name: String,
    oriented_meshes: Vec<OrientedMesh>,
}

impl Interface {
    /// Create an interface
    pub fn new(name: &str, oriented_meshes: Vec<OrientedMesh>) -> Self {
        Self {
            name: name.to_string(),
            oriented_meshes,
        }
    }

    /// Create an interface made of a single mesh with its own orientation
    pub fn from_mesh(name: &str, mesh: MeshId) -> Self {
        Self::new(name, vec![OrientedMesh::new(mesh, false)])
    }

    /// Name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Oriented meshes
    pub fn oriented_meshes(&self) -> &[OrientedMesh] {
        &self.oriented_meshes
    }

    /// Does this interface contain a mesh?
    pub fn contains(&self, mesh: MeshId) -> bool {
        self.oriented_meshes.iter().any(|om| om.mesh == mesh)
    }
}

/// An interface seen from a domain
#[derive(Clone, Debug)]
pub struct Boundary {
    interface: Interface,
    inside: bool,
}

impl Boundary {
    /// Create a boundary; `inside` is true when the domain is enclosed by the interface
    pub fn new(interface: Interface, inside: bool) -> Self {
        Self { interface, inside }
    }

    /// The interface
    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Is the domain inside the interface?
    pub fn inside(&self) -> bool {
        self.inside
    }

    /// Orientation of a mesh of the interface as seen from the domain
    pub fn mesh_orientation(&self, oriented_mesh: &OrientedMesh) -> i32 {
        if self.inside {
            oriented_mesh.orientation()
        } else {
            -oriented_mesh.orientation()
        }
    }
}

/// A region of constant conductivity
#[derive(Clone, Debug)]
pub struct Domain {
    name: String,
    conductivity: f64,
    boundaries: Vec<Boundary>,
}

impl Domain {
    /// Create a domain
    pub fn new(name: &str, conductivity: f64, boundaries: Vec<Boundary>) -> Self {
        Self {
            name: name.to_string(),
            conductivity,
            boundaries,
        }
    }

    /// Name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Conductivity
    pub fn conductivity(&self) -> f64 {
        self.conductivity
    }

    /// Is current allowed to flow in this domain?
    pub fn is_conductive(&self) -> bool {
        self.conductivity != 0.0
    }

    /// Boundaries
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Orientation of a mesh as seen from this domain, or 0 if it does not bound the domain
    pub fn mesh_orientation(&self, mesh: MeshId) -> i32 {
        for boundary in &self.boundaries {
            for om in boundary.interface().oriented_meshes() {
                if om.mesh() == mesh {
                    return boundary.mesh_orientation(om);
                }
            }
        }
        0
    }

    /// Meshes bounding this domain
    pub fn meshes(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.boundaries
            .iter()
            .flat_map(|b| b.interface().oriented_meshes().iter().map(|om| om.mesh()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mesh_orientation() {
        let inner = Interface::from_mesh("inner", 0);
        let outer = Interface::new("outer", vec![OrientedMesh::new(1, true)]);
        let shell = Domain::new(
            "shell",
            0.5,
            vec![Boundary::new(inner, false), Boundary::new(outer, true)],
        );
        assert_eq!(shell.mesh_orientation(0), -1);
        assert_eq!(shell.mesh_orientation(1), -1);
        assert_eq!(shell.mesh_orientation(2), 0);
        assert_eq!(shell.meshes().collect::<Vec<_>>(), vec![0, 1]);
        assert!(shell.is_conductive());
    }
}
