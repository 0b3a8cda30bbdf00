//! # Generation Module
//!
//! Procedural fills used to populate volumes for demos, benchmarks and tests.
//!
//! Every fill walks the whole voxel extent of the volume and writes through
//! [`Volume::set`], so the hierarchy and dirty flag behave exactly as for hand edits.
//! Cells are material cells whose normal points away from the volume center, which
//! gives a ray marcher something plausible to shade.

use cgmath::{InnerSpace, Point3, Vector3};
use noise::{NoiseFn, Perlin};

use super::cell::VoxelCell;
use super::volume::Volume;

/// Perlin samples above this value are solid.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Perlin samples below this value are solid.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scales voxel coordinates before sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;

/// Material ids handed out by the randomized fills.
const RANDOM_MATERIALS: std::ops::Range<u8> = 1..4;

/// Fills every voxel of the volume with `material_id`.
pub fn solid(volume: &mut Volume, material_id: u8) {
    fill_where(volume, |_| Some(material_id));
}

/// Fills every other voxel in a 3D checkerboard, starting solid at the origin.
pub fn checkerboard(volume: &mut Volume, material_id: u8) {
    fill_where(volume, |p| ((p.x + p.y + p.z) % 2 == 0).then_some(material_id));
}

/// Fills voxels at random.
///
/// # Arguments
/// * `sparseness` - Probability in `[0, 1]` that a voxel stays empty
/// * `seed` - Seed for the generator, so fills are reproducible
pub fn random(volume: &mut Volume, sparseness: f64, seed: u64) {
    let mut rng = fastrand::Rng::with_seed(seed);
    fill_where(volume, |_| (rng.f64() >= sparseness).then(|| rng.u8(RANDOM_MATERIALS)));
}

/// Generates cave-like terrain by thresholding 3D Perlin noise.
///
/// Voxels whose sample falls outside
/// [`PERLIN_NEGATIVE_THRESHOLD`]`..=`[`PERLIN_POSITIVE_THRESHOLD`] are solid and get
/// a random material.
pub fn perlin(volume: &mut Volume, seed: u64) {
    let perlin = Perlin::new(seed as u32);
    let mut rng = fastrand::Rng::with_seed(seed);

    fill_where(volume, |p| {
        let sample = perlin.get(to_perlin_pos(p, PERLIN_SCALE_FACTOR));
        (!(PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD).contains(&sample))
            .then(|| rng.u8(RANDOM_MATERIALS))
    });
}

/// Fills the largest sphere centered in the volume that fits its smallest axis.
pub fn sphere(volume: &mut Volume, material_id: u8) {
    let extent = volume.voxel_dimensions();
    let radius = extent.x.min(extent.y).min(extent.z) as f32 / 2.0;
    let center = center_of(extent);

    fill_where(volume, |p| {
        let offset = voxel_center(p) - center;
        (offset.magnitude2() <= radius * radius).then_some(material_id)
    });
}

/// Writes a cell at every voxel for which `material_at` returns a material id.
fn fill_where<F>(volume: &mut Volume, mut material_at: F)
where
    F: FnMut(Point3<u32>) -> Option<u8>,
{
    let extent = volume.voxel_dimensions();
    let center = center_of(extent);

    for z in 0..extent.z {
        for y in 0..extent.y {
            for x in 0..extent.x {
                let position = Point3::new(x, y, z);
                if let Some(material_id) = material_at(position) {
                    let normal = outward_normal(voxel_center(position) - center);
                    volume.set(position, VoxelCell::material(normal, material_id));
                }
            }
        }
    }
}

fn center_of(extent: Vector3<u32>) -> Vector3<f32> {
    extent.cast::<f32>().unwrap_or_else(|| Vector3::new(0.0, 0.0, 0.0)) / 2.0
}

fn voxel_center(p: Point3<u32>) -> Vector3<f32> {
    Vector3::new(p.x as f32 + 0.5, p.y as f32 + 0.5, p.z as f32 + 0.5)
}

/// Unit vector along `offset`, or +Y at the exact center.
fn outward_normal(offset: Vector3<f32>) -> Vector3<f32> {
    if offset.magnitude2() > f32::EPSILON {
        offset.normalize()
    } else {
        Vector3::unit_y()
    }
}

fn to_perlin_pos(p: Point3<u32>, scale_factor: f64) -> [f64; 3] {
    [
        p.x as f64 * scale_factor,
        p.y as f64 * scale_factor,
        p.z as f64 * scale_factor,
    ]
}
