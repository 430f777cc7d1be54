//! Mesh file serialization
//!
//! Meshes can be loaded from and saved to RON files containing raw
//! positions and cells.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::{Mesh, MeshError};

/// A serializable indexed mesh
///
/// # Example
/// ```ignore
/// MeshFile(
///     name: "triangle",
///     positions: [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)],
///     cells: [(0, 1, 2)],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshFile {
    /// Mesh name (for display/debugging)
    #[serde(default)]
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub cells: Vec<[u32; 3]>,
}

impl MeshFile {
    /// Load a mesh file from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a mesh file from a RON string
    pub fn from_ron(contents: &str) -> Result<Self, MeshError> {
        Ok(ron::from_str(contents)?)
    }

    /// Save this mesh file as RON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MeshError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Create a mesh file from an existing mesh
    pub fn from_mesh(name: impl Into<String>, mesh: &Mesh) -> Self {
        Self {
            name: name.into(),
            positions: mesh.positions().to_vec(),
            cells: mesh.cells().to_vec(),
        }
    }

    /// Validate and convert into a [`Mesh`]
    pub fn into_mesh(self) -> Result<Mesh, MeshError> {
        log::debug!(
            "Mesh file '{}': {} vertices, {} triangles",
            self.name,
            self.positions.len(),
            self.cells.len()
        );
        Mesh::new(self.positions, self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"
        MeshFile(
            name: "triangle",
            positions: [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)],
            cells: [(0, 1, 2)],
        )
    "#;

    #[test]
    fn test_parse_ron() {
        let file = MeshFile::from_ron(TRIANGLE).unwrap();
        assert_eq!(file.name, "triangle");
        let mesh = file.into_mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.cells(), &[[0, 1, 2]]);
    }

    #[test]
    fn test_invalid_indices_rejected() {
        let contents = "(positions: [(0.0, 0.0, 0.0)], cells: [(0, 1, 2)])";
        let file = MeshFile::from_ron(contents).unwrap();
        assert!(matches!(file.into_mesh(), Err(MeshError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_parse_error() {
        let result = MeshFile::from_ron("MeshFile(positions: [oops])");
        assert!(matches!(result, Err(MeshError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let mesh = crate::cuboid(aoview_math::Vec3::new(1.0, 1.0, 1.0), 1);
        let path = std::env::temp_dir().join("aoview_mesh_file_test.ron");

        MeshFile::from_mesh("cube", &mesh).save(&path).unwrap();
        let loaded = MeshFile::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.name, "cube");
        assert_eq!(loaded.into_mesh().unwrap(), mesh);
    }
}
