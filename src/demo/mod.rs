//! # Demo Module
//!
//! A headless driver that builds a scene from a [`DemoConfig`], runs a few frames of
//! edits and draws, and optionally mirrors the result into GPU buffers.

use anyhow::Context;
use cgmath::{Matrix4, Point3, Vector3, Vector4};
use log::{debug, info, warn};
use web_time::Instant;

use crate::rendering::gpu_uploader::GpuVolumeUploader;
use crate::rendering::VolumeRenderer;
use crate::voxels::generation;
use crate::voxels::scene::Scene;
use crate::voxels::volume::{Volume, VolumeBuffers};

pub mod config;

pub use config::{DemoConfig, DemoObject, FillPattern};

/// Palette entries the fills refer to.
const DEMO_MATERIALS: [(u8, Vector4<f32>); 3] = [
    (
        1,
        Vector4 {
            x: 0.45,
            y: 0.32,
            z: 0.2,
            w: 1.0,
        },
    ),
    (
        2,
        Vector4 {
            x: 0.35,
            y: 0.6,
            z: 0.25,
            w: 1.0,
        },
    ),
    (
        3,
        Vector4 {
            x: 0.5,
            y: 0.5,
            z: 0.55,
            w: 1.0,
        },
    ),
];

/// Counts what would have been uploaded, without a GPU.
#[derive(Debug, Default)]
pub struct FrameStats {
    /// Volumes drawn
    pub draws: usize,
    /// Draws whose volume contents differed from the last draw at their index
    pub fresh_draws: usize,
    /// Bytes across the flat buffers of fresh draws
    pub fresh_bytes: usize,
    /// `(volume_id, generation)` last drawn per object index
    seen: Vec<Option<(u64, u64)>>,
}

impl VolumeRenderer for FrameStats {
    type Error = std::convert::Infallible;

    fn draw_volume(
        &mut self,
        object_index: usize,
        buffers: VolumeBuffers<'_>,
    ) -> Result<(), Self::Error> {
        self.draws += 1;

        if self.seen.len() <= object_index {
            self.seen.resize(object_index + 1, None);
        }
        let contents = Some((buffers.volume_id, buffers.generation));
        if self.seen[object_index] != contents {
            self.seen[object_index] = contents;
            self.fresh_draws += 1;
            self.fresh_bytes += std::mem::size_of_val(buffers.chunk_occupancy)
                + std::mem::size_of_val(buffers.sub_chunk_occupancy)
                + std::mem::size_of_val(buffers.voxel_payload)
                + std::mem::size_of_val(buffers.material_palette);
        }

        Ok(())
    }
}

/// Builds the volume described by `object`.
pub fn build_object(object: &DemoObject) -> anyhow::Result<Volume> {
    let [x, y, z] = object.dimensions;
    let [tx, ty, tz] = object.translation;

    let mut volume = Volume::new(Vector3::new(x, y, z))?
        .with_model_matrix(Matrix4::from_translation(Vector3::new(tx, ty, tz)));

    for (index, material) in DEMO_MATERIALS {
        volume.set_material(index, material);
    }

    match object.fill {
        FillPattern::Solid => generation::solid(&mut volume, 1),
        FillPattern::Checkerboard => generation::checkerboard(&mut volume, 2),
        FillPattern::Random { sparseness } => {
            generation::random(&mut volume, sparseness, object.seed)
        }
        FillPattern::Perlin => generation::perlin(&mut volume, object.seed),
        FillPattern::Sphere => generation::sphere(&mut volume, 3),
    }

    Ok(volume)
}

/// Builds every configured object into a scene.
pub fn build_scene(config: &DemoConfig) -> anyhow::Result<Scene> {
    let mut scene = Scene::new();

    for (index, object) in config.objects.iter().enumerate() {
        let started = Instant::now();
        let volume = build_object(object)
            .with_context(|| format!("Failed to build demo object {}", index))?;

        info!(
            "Object {}: {:?} fill, {} voxels in {} chunks ({:?})",
            index,
            object.fill,
            volume.voxel_count(),
            volume.chunk_count(),
            started.elapsed()
        );

        scene.add_object(volume);
    }

    Ok(scene)
}

/// Runs the demo described by `config`.
pub fn run(config: &DemoConfig) -> anyhow::Result<()> {
    let mut scene = build_scene(config)?;
    let mut stats = FrameStats::default();

    for frame in 0..config.frames {
        if frame > 0 {
            carve_origin(&mut scene, frame);
        }

        let started = Instant::now();
        scene.draw(&mut stats).unwrap_or_else(|never| match never {});
        debug!("Frame {} drawn in {:?}", frame, started.elapsed());
    }

    info!(
        "{} draws over {} frames, {} fresh ({} bytes)",
        stats.draws, config.frames, stats.fresh_draws, stats.fresh_bytes
    );

    if config.upload_to_gpu {
        match pollster::block_on(request_headless_device()) {
            Ok((device, queue)) => upload_scene(&mut scene, device, queue)?,
            Err(err) => warn!("Skipping GPU upload: {:#}", err),
        }
    }

    Ok(())
}

/// Removes a voxel near the origin of the first object so the next draw has
/// something to rebuild.
fn carve_origin(scene: &mut Scene, frame: u32) {
    let Some(volume) = scene.object_mut(0) else {
        return;
    };
    let position = Point3::new(frame, frame, frame);
    if volume.contains(position) {
        volume.clear_at(position);
        debug!("Carved voxel {:?} from object 0", position);
    }
}

fn upload_scene(
    scene: &mut Scene,
    device: wgpu::Device,
    queue: wgpu::Queue,
) -> anyhow::Result<()> {
    let mut uploader = GpuVolumeUploader::new(device, queue);
    scene.draw(&mut uploader).context("Failed to upload scene")?;

    let buffer_state = uploader.buffer_state();
    buffer_state.queue().submit(std::iter::empty());

    info!(
        "Uploaded {} objects: {} bytes allocated, {} bytes used",
        scene.live_count(),
        buffer_state.get_total_allocated_memory(),
        buffer_state.get_total_used_memory()
    );

    Ok(())
}

async fn request_headless_device() -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("No GPU adapter available")?;

    info!("Using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Voxel Forge Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("Failed to create GPU device")?;

    Ok((device, queue))
}
