use serde::{Deserialize, Serialize};

/// Mesh resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Chords per quarter arc on rounded plate corners.
    pub arc_segments: usize,
    /// Facets around each leg frustum.
    pub radial_segments: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            arc_segments: 8,
            radial_segments: 16,
        }
    }
}

impl MeshConfig {
    /// Coarse meshes for interactive dragging.
    pub fn preview() -> Self {
        Self {
            arc_segments: 4,
            radial_segments: 8,
        }
    }

    /// Fine meshes for stills and export.
    pub fn high_detail() -> Self {
        Self {
            arc_segments: 16,
            radial_segments: 48,
        }
    }

    /// Clamp degenerate counts to the smallest usable values.
    pub fn sanitized(self) -> Self {
        Self {
            arc_segments: self.arc_segments.max(1),
            radial_segments: self.radial_segments.max(3),
        }
    }
}
