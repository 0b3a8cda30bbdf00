//! Demo configuration, read from JSON.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// How a demo object is populated.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPattern {
    /// Every voxel set
    Solid,
    /// Alternating voxels
    Checkerboard,
    /// Each voxel empty with probability `sparseness`
    Random {
        /// Probability in `[0, 1]` that a voxel stays empty
        sparseness: f64,
    },
    /// Thresholded Perlin noise terrain
    Perlin,
    /// A centered ball
    Sphere,
}

/// A single volume in the demo scene.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoObject {
    /// Size in chunks
    pub dimensions: [u32; 3],
    /// Pattern the volume is filled with
    pub fill: FillPattern,
    /// Seed for the randomized fills
    pub seed: u64,
    /// World space offset applied through the model matrix
    pub translation: [f32; 3],
}

impl Default for DemoObject {
    fn default() -> Self {
        DemoObject {
            dimensions: [2, 2, 2],
            fill: FillPattern::Sphere,
            seed: 0,
            translation: [0.0, 0.0, 0.0],
        }
    }
}

/// Top level demo settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Volumes added to the scene, in order
    pub objects: Vec<DemoObject>,
    /// Upload the scene through a headless wgpu device
    pub upload_to_gpu: bool,
    /// Number of frames to simulate; an edit is applied between frames
    pub frames: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            objects: vec![
                DemoObject::default(),
                DemoObject {
                    dimensions: [4, 2, 4],
                    fill: FillPattern::Perlin,
                    seed: 1,
                    translation: [40.0, 0.0, 0.0],
                },
                DemoObject {
                    dimensions: [1, 1, 1],
                    fill: FillPattern::Random { sparseness: 0.9 },
                    seed: 2,
                    translation: [0.0, 40.0, 0.0],
                },
            ],
            upload_to_gpu: false,
            frames: 3,
        }
    }
}

impl DemoConfig {
    /// Reads a configuration file. Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read demo config {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse demo config {}", path.display()))
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
