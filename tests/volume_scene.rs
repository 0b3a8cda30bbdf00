use cgmath::{Matrix4, Point3, Vector3, Vector4};
use voxel_forge::voxels::bit_index;
use voxel_forge::{Scene, Volume, VolumeBuffers, VolumeRenderer, VoxelCell};

/// Keeps a copy of everything it is asked to draw.
#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<Recorded>,
}

struct Recorded {
    object_index: usize,
    generation: u64,
    chunk_occupancy: Vec<u64>,
    sub_chunk_occupancy: Vec<u64>,
    voxel_payload: Vec<u32>,
    model_matrix: Matrix4<f32>,
}

impl VolumeRenderer for RecordingRenderer {
    type Error = ();

    fn draw_volume(&mut self, object_index: usize, buffers: VolumeBuffers<'_>) -> Result<(), ()> {
        self.frames.push(Recorded {
            object_index,
            generation: buffers.generation,
            chunk_occupancy: buffers.chunk_occupancy.to_vec(),
            sub_chunk_occupancy: buffers.sub_chunk_occupancy.to_vec(),
            voxel_payload: buffers.voxel_payload.to_vec(),
            model_matrix: buffers.model_matrix,
        });
        Ok(())
    }
}

fn red() -> VoxelCell {
    VoxelCell::color(Vector3::new(1.0, 0.0, 0.0))
}

#[test]
fn single_voxel_reaches_the_renderer() {
    let mut volume = Volume::new(Vector3::new(1, 1, 1)).unwrap();
    volume.set(Point3::new(5, 5, 5), red());

    let mut renderer = RecordingRenderer::default();
    volume.draw(0, &mut renderer).unwrap();

    let frame = &renderer.frames[0];
    assert_eq!(frame.chunk_occupancy, vec![1u64 << bit_index(1, 1, 1)]);
    assert_eq!(frame.sub_chunk_occupancy[21], 1u64 << 21);
    let start = (5 + 5 * 16 + 5 * 256) * 4;
    assert_eq!(&frame.voxel_payload[start..start + 4], &red().to_words());
}

#[test]
fn edits_between_draws_bump_the_generation() {
    let mut scene = Scene::new();
    let mut volume = Volume::new(Vector3::new(2, 1, 1)).unwrap();
    volume.set(Point3::new(0, 0, 0), red());
    let index = scene.add_object(volume);

    let mut renderer = RecordingRenderer::default();
    scene.draw(&mut renderer).unwrap();
    scene.draw(&mut renderer).unwrap();

    let volume = scene.object_mut(index).unwrap();
    volume.set(Point3::new(20, 0, 0), red());
    volume.clear_at(Point3::new(0, 0, 0));
    scene.draw(&mut renderer).unwrap();

    let generations: Vec<_> = renderer.frames.iter().map(|f| f.generation).collect();
    assert_eq!(generations, vec![1, 1, 2]);

    let last = &renderer.frames[2];
    assert_eq!(last.chunk_occupancy[0], 0);
    assert_eq!(last.chunk_occupancy[1], 1u64 << bit_index(1, 0, 0));
    assert_eq!(scene.object(index).unwrap().chunk_count(), 1);
}

#[test]
fn scene_draws_in_insertion_order_with_placement() {
    let mut scene = Scene::new();
    for offset in [0.0, 10.0, 20.0] {
        let volume = Volume::new(Vector3::new(1, 1, 1))
            .unwrap()
            .with_model_matrix(Matrix4::from_translation(Vector3::new(offset, 0.0, 0.0)));
        scene.add_object(volume);
    }
    scene.remove_object(0);

    let mut renderer = RecordingRenderer::default();
    scene.draw(&mut renderer).unwrap();

    let drawn: Vec<_> = renderer
        .frames
        .iter()
        .map(|f| (f.object_index, f.model_matrix.w.x))
        .collect();
    assert_eq!(drawn, vec![(1, 10.0), (2, 20.0)]);
}

#[test]
fn moving_an_object_does_not_rebuild() {
    let mut volume = Volume::new(Vector3::new(1, 1, 1)).unwrap();
    volume.set(Point3::new(1, 1, 1), red());

    let mut renderer = RecordingRenderer::default();
    volume.draw(0, &mut renderer).unwrap();
    volume.set_model_matrix(Matrix4::from_scale(2.0));
    volume.draw(0, &mut renderer).unwrap();

    assert_eq!(volume.rebuild_count(), 1);
    assert_eq!(renderer.frames[1].model_matrix, Matrix4::from_scale(2.0));
}

#[test]
fn palette_edits_rebuild() {
    let mut volume = Volume::new(Vector3::new(1, 1, 1)).unwrap();
    volume.rebuild();
    volume.set_material(200, Vector4::new(0.0, 0.0, 1.0, 0.5));

    let buffers = volume.buffers();
    assert_eq!(buffers.generation, 2);
    assert_eq!(buffers.material_palette[200], [0.0, 0.0, 1.0, 0.5]);
}
