// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene elements: one named, styled mesh per apartment record
//!
//! Elements are built category by category (areas, separators, openings).
//! Names follow `{category}_{index}_{subtype}_{id}` where `index` counts
//! within the category and `id` is the area id for areas that have one, or
//! the running counter over the whole apartment otherwise.

use crate::extrusion::{build_flat_mesh, extrude_ring};
use crate::mesh::{Aabb, Mesh};
use crate::styling::{plan_layer_offset, style_for, ElementStyle};
use homecraft_core::{
    ApartmentEntity, ApartmentPolygons, ApartmentRecord, EntityKind, PolygonRecord, Subtype,
};
use serde::{Deserialize, Serialize};

/// How polygon records become meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    /// Flat polygons on their plan layer, rendered double-sided
    Flat,
    /// Closed prisms from elevation to elevation + height
    Extruded,
}

/// Metadata attached to every scene element for inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementMetadata {
    pub entity_type: EntityKind,
    pub entity_subtype: Subtype,
    pub roomtype: Option<String>,
    pub zoning: Option<String>,
    pub elevation: f64,
    pub height: f64,
    pub area_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub coordinates: Vec<[f64; 2]>,
}

impl ElementMetadata {
    pub fn from_entity(entity: &ApartmentEntity) -> Self {
        Self {
            entity_type: entity.entity_type,
            entity_subtype: entity.entity_subtype.clone(),
            roomtype: entity.roomtype.clone(),
            zoning: entity.zoning.clone(),
            elevation: entity.elevation,
            height: entity.height,
            area_id: entity.area_id,
            unit_id: entity.unit_id,
            coordinates: entity.coordinates.clone(),
        }
    }

    /// Polygon payloads carry no unit id; `id` is the area id
    pub fn from_polygon(kind: EntityKind, record: &PolygonRecord) -> Self {
        Self {
            entity_type: kind,
            entity_subtype: record.subtype.clone(),
            roomtype: record.roomtype.clone(),
            zoning: record.zoning.clone(),
            elevation: record.elevation,
            height: record.height,
            area_id: record.id,
            unit_id: None,
            coordinates: record.coordinates.clone(),
        }
    }
}

/// A renderable mesh derived from one polygon record
#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    pub name: String,
    pub metadata: ElementMetadata,
    pub mesh: Mesh,
    pub style: ElementStyle,
    pub double_sided: bool,
}

impl SceneElement {
    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.metadata.entity_type
    }

    #[inline]
    pub fn subtype(&self) -> &Subtype {
        &self.metadata.entity_subtype
    }

    pub fn is_wall(&self) -> bool {
        self.kind() == EntityKind::Separator
    }

    pub fn is_door(&self) -> bool {
        self.kind() == EntityKind::Opening && self.subtype().is_door()
    }

    pub fn is_window(&self) -> bool {
        self.kind() == EntityKind::Opening && self.subtype().is_window()
    }
}

/// Mesh name of one element
pub fn element_name(
    kind: EntityKind,
    index: usize,
    subtype: &Subtype,
    area_id: Option<i64>,
    counter: usize,
) -> String {
    let id = match (kind, area_id) {
        (EntityKind::Area, Some(id)) => id.to_string(),
        _ => counter.to_string(),
    };
    format!("{}_{}_{}_{}", kind, index, subtype, id)
}

/// Build the mesh of one record
pub fn build_mesh(metadata: &ElementMetadata, mode: BuildMode) -> Mesh {
    match mode {
        BuildMode::Flat => build_flat_mesh(
            &metadata.coordinates,
            plan_layer_offset(metadata.entity_type),
        ),
        BuildMode::Extruded => {
            extrude_ring(&metadata.coordinates, metadata.elevation, metadata.height)
        }
    }
}

/// Build scene elements from metadata in category order
///
/// Every record yields an element, even when its mesh is empty; such
/// elements keep their name slot so counters stay stable across modes.
pub fn build_elements<I>(items: I, mode: BuildMode) -> Vec<SceneElement>
where
    I: IntoIterator<Item = ElementMetadata>,
{
    let mut per_kind = [0usize; 3];
    let mut counter = 0usize;
    let mut elements = Vec::new();

    for metadata in items {
        let kind = metadata.entity_type;
        let slot = EntityKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        let index = per_kind[slot];
        per_kind[slot] += 1;

        let name = element_name(
            kind,
            index,
            &metadata.entity_subtype,
            metadata.area_id,
            counter,
        );
        counter += 1;

        let mesh = build_mesh(&metadata, mode);
        let style = style_for(&metadata.entity_subtype);

        elements.push(SceneElement {
            name,
            metadata,
            mesh,
            style,
            double_sided: mode == BuildMode::Flat,
        });
    }

    tracing::debug!(
        elements = elements.len(),
        empty = elements.iter().filter(|e| e.mesh.is_empty()).count(),
        ?mode,
        "Built scene elements"
    );

    elements
}

/// Element metadata of an extracted apartment, areas first
pub fn record_metadata(record: &ApartmentRecord) -> Vec<ElementMetadata> {
    EntityKind::ALL
        .iter()
        .flat_map(|kind| record.entities(*kind))
        .map(ElementMetadata::from_entity)
        .collect()
}

/// Element metadata of a polygon payload, areas first
pub fn polygons_metadata(polygons: &ApartmentPolygons) -> Vec<ElementMetadata> {
    EntityKind::ALL
        .iter()
        .flat_map(|kind| {
            polygons
                .records(*kind)
                .iter()
                .map(move |r| ElementMetadata::from_polygon(*kind, r))
        })
        .collect()
}

/// Combined bounds of all non-empty element meshes
pub fn scene_bounds(elements: &[SceneElement]) -> Aabb {
    elements
        .iter()
        .filter(|e| !e.mesh.is_empty())
        .fold(Aabb::empty(), |acc, e| acc.union(&e.mesh.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecraft_core::DEFAULT_HEIGHT;

    fn polygon(subtype: Subtype, id: Option<i64>) -> PolygonRecord {
        PolygonRecord {
            coordinates: vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]],
            elevation: 0.0,
            height: DEFAULT_HEIGHT,
            subtype,
            id,
            roomtype: None,
            zoning: None,
        }
    }

    fn sample() -> ApartmentPolygons {
        ApartmentPolygons {
            apartment_id: "apt".into(),
            areas: vec![
                polygon(Subtype::Bathroom, Some(619311)),
                polygon(Subtype::Kitchen, None),
            ],
            separators: vec![polygon(Subtype::Wall, None)],
            openings: vec![polygon(Subtype::Door, None), polygon(Subtype::Window, None)],
        }
    }

    #[test]
    fn test_naming_convention() {
        let elements = build_elements(polygons_metadata(&sample()), BuildMode::Flat);
        let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "area_0_BATHROOM_619311",
                "area_1_KITCHEN_1",
                "separator_0_WALL_2",
                "opening_0_DOOR_3",
                "opening_1_WINDOW_4",
            ]
        );
    }

    #[test]
    fn test_flat_elements_are_double_sided_and_layered() {
        let elements = build_elements(polygons_metadata(&sample()), BuildMode::Flat);
        assert!(elements.iter().all(|e| e.double_sided));

        let wall = &elements[2];
        assert!(wall.is_wall());
        assert!((wall.mesh.bounds().min.z - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_extruded_elements_are_single_sided() {
        let elements = build_elements(polygons_metadata(&sample()), BuildMode::Extruded);
        assert!(elements.iter().all(|e| !e.double_sided));
        assert_eq!(elements[0].mesh.vertex_count(), 8);
        assert_eq!(elements[0].mesh.triangle_count(), 12);
    }

    #[test]
    fn test_category_predicates() {
        let elements = build_elements(polygons_metadata(&sample()), BuildMode::Flat);
        assert!(elements[3].is_door());
        assert!(!elements[3].is_window());
        assert!(elements[4].is_window());
        assert!(elements[4].style.is_transparent());
    }

    #[test]
    fn test_degenerate_record_keeps_its_slot() {
        let mut polygons = sample();
        polygons.separators[0].coordinates = vec![[0.0, 0.0], [1.0, 0.0]];
        let elements = build_elements(polygons_metadata(&polygons), BuildMode::Extruded);
        assert_eq!(elements.len(), 5);
        assert!(elements[2].mesh.is_empty());
        assert_eq!(elements[3].name, "opening_0_DOOR_3");

        let bounds = scene_bounds(&elements);
        assert!((bounds.max.x - 4.0).abs() < 1e-6);
    }
}
