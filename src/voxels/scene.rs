//! # Scene Module
//!
//! A `Scene` is an ordered list of independent volumes drawn together. It adds no
//! data structure of its own: every object keeps its own chunks, buffers and model
//! matrix, and the scene only forwards draws in insertion order.
//!
//! Object indices are stable. Removing an object leaves an empty slot behind, so the
//! index of every other object (and any GPU resources keyed by it) stays valid.

use log::debug;

use super::volume::Volume;
use crate::rendering::VolumeRenderer;

/// An ordered collection of volumes composed under a single draw call.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Option<Volume>>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Scene {
            objects: Vec::new(),
        }
    }

    /// Appends `volume` and returns its index.
    ///
    /// Indices start at 0 and are never reused.
    pub fn add_object(&mut self, volume: Volume) -> usize {
        let volume_size = volume.size();
        self.objects.push(Some(volume));
        let index = self.objects.len() - 1;
        debug!("Added object {} of size {:?}", index, volume_size);
        index
    }

    /// Takes the volume at `index` out of the scene, leaving its slot empty.
    pub fn remove_object(&mut self, index: usize) -> Option<Volume> {
        self.objects.get_mut(index)?.take()
    }

    /// The volume at `index`, unless it was removed.
    pub fn object(&self, index: usize) -> Option<&Volume> {
        self.objects.get(index)?.as_ref()
    }

    /// Mutable access to the volume at `index`, unless it was removed.
    pub fn object_mut(&mut self, index: usize) -> Option<&mut Volume> {
        self.objects.get_mut(index)?.as_mut()
    }

    /// Number of slots, including empty ones.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// `true` when no object was ever added.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of slots that still hold a volume.
    pub fn live_count(&self) -> usize {
        self.objects.iter().flatten().count()
    }

    /// Iterates the present volumes with their indices, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Volume)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|volume| (index, volume)))
    }

    /// Draws every present volume in insertion order, skipping empty slots.
    ///
    /// Each volume is rebuilt first if it has pending edits. The first error reported
    /// by `renderer` stops the pass and is returned.
    pub fn draw<R>(&mut self, renderer: &mut R) -> Result<(), R::Error>
    where
        R: VolumeRenderer + ?Sized,
    {
        for (index, slot) in self.objects.iter_mut().enumerate() {
            if let Some(volume) = slot {
                volume.draw(index, renderer)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::voxels::volume::VolumeBuffers;
    use cgmath::Vector3;

    #[derive(Default)]
    struct DrawLog {
        drawn: Vec<(usize, u64)>,
        fail_on: Option<usize>,
    }

    impl VolumeRenderer for DrawLog {
        type Error = usize;

        fn draw_volume(&mut self, index: usize, buffers: VolumeBuffers<'_>) -> Result<(), usize> {
            if self.fail_on == Some(index) {
                return Err(index);
            }
            self.drawn.push((index, buffers.generation));
            Ok(())
        }
    }

    fn volume() -> Volume {
        Volume::new(Vector3::new(1, 1, 1)).unwrap()
    }

    #[test]
    fn add_object_returns_sequential_indices() {
        let mut scene = Scene::new();
        assert_eq!(scene.add_object(volume()), 0);
        assert_eq!(scene.add_object(volume()), 1);
        assert_eq!(scene.add_object(volume()), 2);
    }

    #[test]
    fn removed_slots_are_skipped_and_never_reused() {
        let mut scene = Scene::new();
        scene.add_object(volume());
        scene.add_object(volume());
        scene.add_object(volume());

        assert!(scene.remove_object(1).is_some());
        assert!(scene.remove_object(1).is_none());
        assert_eq!(scene.add_object(volume()), 3);
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.live_count(), 3);

        let mut log = DrawLog::default();
        scene.draw(&mut log).unwrap();
        let order: Vec<_> = log.drawn.iter().map(|(index, _)| *index).collect();
        assert_eq!(order, vec![0, 2, 3]);
    }

    #[test]
    fn draw_rebuilds_each_object_once() {
        let mut scene = Scene::new();
        let index = scene.add_object(volume());

        let mut log = DrawLog::default();
        scene.draw(&mut log).unwrap();
        scene.draw(&mut log).unwrap();

        assert_eq!(log.drawn, vec![(0, 1), (0, 1)]);
        assert_eq!(scene.object(index).unwrap().rebuild_count(), 1);
    }

    #[test]
    fn draw_stops_at_first_error() {
        let mut scene = Scene::new();
        scene.add_object(volume());
        scene.add_object(volume());
        scene.add_object(volume());

        let mut log = DrawLog {
            fail_on: Some(1),
            ..Default::default()
        };
        assert_eq!(scene.draw(&mut log), Err(1));
        assert_eq!(log.drawn, vec![(0, 1)]);
    }

    #[test]
    fn iter_yields_present_objects() {
        let mut scene = Scene::new();
        scene.add_object(volume());
        scene.add_object(volume());
        scene.remove_object(0);

        let indices: Vec<_> = scene.iter().map(|(index, _)| index).collect();
        assert_eq!(indices, vec![1]);
        assert!(scene.object(0).is_none());
        assert!(scene.object_mut(1).is_some());
    }
}
