//! Mesh error types
//!
//! Provides error handling for mesh validation and mesh file loading.

use std::fmt;
use std::io;

/// Error type for mesh operations
#[derive(Debug)]
pub enum MeshError {
    /// A cell references a vertex that does not exist
    IndexOutOfRange {
        /// Index of the offending cell
        cell: usize,
        /// The out-of-range vertex index
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },
    /// A position component is NaN or infinite
    NonFinitePosition(usize),
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax or structure)
    Parse(String),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::IndexOutOfRange { cell, index, vertex_count } => write!(
                f,
                "Cell {} references vertex {} but mesh has {} vertices",
                cell, index, vertex_count
            ),
            MeshError::NonFinitePosition(vertex) => {
                write!(f, "Vertex {} has a non-finite position", vertex)
            }
            MeshError::Io(err) => write!(f, "Mesh IO error: {}", err),
            MeshError::Parse(msg) => write!(f, "Mesh parse error: {}", msg),
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MeshError {
    fn from(err: io::Error) -> Self {
        MeshError::Io(err)
    }
}

impl From<ron::error::SpannedError> for MeshError {
    fn from(err: ron::error::SpannedError) -> Self {
        MeshError::Parse(err.to_string())
    }
}

impl From<ron::Error> for MeshError {
    fn from(err: ron::Error) -> Self {
        MeshError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_index_out_of_range_display() {
        let err = MeshError::IndexOutOfRange { cell: 2, index: 9, vertex_count: 4 };
        let msg = format!("{}", err);
        assert!(msg.contains("Cell 2"));
        assert!(msg.contains("vertex 9"));
        assert!(msg.contains("4 vertices"));
    }

    #[test]
    fn test_io_error_source() {
        let err: MeshError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("missing"));
    }

    #[test]
    fn test_parse_error_has_no_source() {
        let err = MeshError::Parse("bad".to_string());
        assert!(err.source().is_none());
    }
}
