//! Plain-data ownership of brushes: a [`World`] owns [`Entity`]s and each
//! entity owns its brushes. Edits go through the owner and hand back a
//! [`GeometryChanged`] value instead of firing signals.

use std::collections::BTreeMap;

use glam::{DAffine3, DVec3};
use serde::{Deserialize, Serialize};

use crate::brush::{Brush, GeometryChanged};

/// Index of an entity within its world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityIdx(pub usize);

/// Index of a brush within its entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrushIdx(pub usize);

/// A map entity: a class name, key/value properties and owned brushes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub classname: String,
    properties: BTreeMap<String, String>,
    brushes: Vec<Brush>,
}

impl Entity {
    #[must_use]
    pub fn new(classname: impl Into<String>) -> Self {
        Self {
            classname: classname.into(),
            ..Self::default()
        }
    }

    /// Set a property, returning the previous value.
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.properties.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn add_brush(&mut self, brush: Brush) -> BrushIdx {
        self.brushes.push(brush);
        BrushIdx(self.brushes.len() - 1)
    }

    /// Remove a brush. Later brushes shift down by one index.
    pub fn remove_brush(&mut self, idx: BrushIdx) -> Option<Brush> {
        (idx.0 < self.brushes.len()).then(|| self.brushes.remove(idx.0))
    }

    #[must_use]
    pub fn brush(&self, idx: BrushIdx) -> Option<&Brush> {
        self.brushes.get(idx.0)
    }

    #[must_use]
    pub fn brushes(&self) -> &[Brush] {
        &self.brushes
    }
}

/// The whole map. Entity 0 is conventionally `worldspawn`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct World {
    entities: Vec<Entity>,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: vec![Entity::new("worldspawn")],
        }
    }

    pub fn add_entity(&mut self, entity: Entity) -> EntityIdx {
        self.entities.push(entity);
        EntityIdx(self.entities.len() - 1)
    }

    #[must_use]
    pub fn entity(&self, idx: EntityIdx) -> Option<&Entity> {
        self.entities.get(idx.0)
    }

    pub fn entity_mut(&mut self, idx: EntityIdx) -> Option<&mut Entity> {
        self.entities.get_mut(idx.0)
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Total brushes across all entities.
    #[must_use]
    pub fn brush_count(&self) -> usize {
        self.entities.iter().map(|e| e.brushes.len()).sum()
    }

    fn brush_mut(&mut self, entity: EntityIdx, brush: BrushIdx) -> Option<&mut Brush> {
        self.entities.get_mut(entity.0)?.brushes.get_mut(brush.0)
    }

    /// Move one brush. `None` if either index is unknown.
    pub fn translate_brush(
        &mut self,
        entity: EntityIdx,
        brush: BrushIdx,
        offset: DVec3,
    ) -> Option<GeometryChanged> {
        Some(self.brush_mut(entity, brush)?.translate(offset))
    }

    /// Apply an affine map to one brush; see [`Brush::transform`] for the
    /// maps it accepts.
    pub fn transform_brush(
        &mut self,
        entity: EntityIdx,
        brush: BrushIdx,
        matrix: &DAffine3,
    ) -> Option<GeometryChanged> {
        Some(self.brush_mut(entity, brush)?.transform(matrix))
    }

    /// Swap in a rebuilt brush after a topology change, returning the old
    /// one.
    pub fn replace_brush(
        &mut self,
        entity: EntityIdx,
        brush: BrushIdx,
        rebuilt: Brush,
    ) -> Option<Brush> {
        let slot = self.brush_mut(entity, brush)?;
        Some(std::mem::replace(slot, rebuilt))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::BrushBuilder;

    fn cube(center: DVec3, half: f64) -> Brush {
        let corners: Vec<DVec3> = (0..8)
            .map(|i| {
                let sign = |bit: i32| if i & bit == 0 { -half } else { half };
                center + DVec3::new(sign(1), sign(2), sign(4))
            })
            .collect();
        BrushBuilder::new().build_from_vertices(&corners).unwrap()
    }

    #[test]
    fn test_world_owns_entities_and_brushes() {
        let mut world = World::new();
        let worldspawn = EntityIdx(0);
        world
            .entity_mut(worldspawn)
            .unwrap()
            .add_brush(cube(DVec3::ZERO, 16.0));

        let mut door = Entity::new("func_door");
        door.set_property("speed", "100");
        let door_brush = door.add_brush(cube(DVec3::new(64.0, 0.0, 0.0), 8.0));
        let door_idx = world.add_entity(door);

        assert_eq!(world.entities().len(), 2);
        assert_eq!(world.brush_count(), 2);
        assert_eq!(world.entity(door_idx).unwrap().property("speed"), Some("100"));

        let change = world
            .translate_brush(door_idx, door_brush, DVec3::new(0.0, 0.0, 32.0))
            .unwrap();
        assert!((change.new_bounds.center() - DVec3::new(64.0, 0.0, 32.0)).length() < 1e-9);
    }

    #[test]
    fn test_unknown_indices() {
        let mut world = World::new();
        assert!(world.translate_brush(EntityIdx(0), BrushIdx(0), DVec3::X).is_none());
        assert!(
            world
                .transform_brush(EntityIdx(5), BrushIdx(0), &DAffine3::IDENTITY)
                .is_none()
        );
        assert!(world.entity_mut(EntityIdx(0)).unwrap().remove_brush(BrushIdx(0)).is_none());
    }

    #[test]
    fn test_replace_brush() {
        let mut world = World::new();
        let brush = world
            .entity_mut(EntityIdx(0))
            .unwrap()
            .add_brush(cube(DVec3::ZERO, 1.0));

        let old = world
            .replace_brush(EntityIdx(0), brush, cube(DVec3::ZERO, 2.0))
            .unwrap();
        assert!((old.bounds().size() - DVec3::splat(2.0)).length() < 1e-9);
        let current = world.entity(EntityIdx(0)).unwrap().brush(brush).unwrap();
        assert!((current.bounds().size() - DVec3::splat(4.0)).length() < 1e-9);
    }
}
