// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scene building: CSV rows to aligned meshes and GLB.

use approx::assert_relative_eq;
use homecraft_core::ApartmentDataset;
use homecraft_geometry::{
    align_scene, build_elements, encode_glb, polygons_metadata, record_metadata, scene_bounds,
    style_for, BuildMode, SceneElement,
};

const DATASET: &str = "\
apartment_id,entity_type,entity_subtype,geom,elevation,height,zoning,roomtype,area_id,unit_id
apt-1,area,BEDROOM,\"POLYGON ((0 0, 4 0, 4 3, 0 3, 0 0))\",0,2.6,Zone1,Bedroom,619311,12
apt-1,area,BATHROOM,\"POLYGON ((4 0, 6 0, 6 3, 4 3, 4 0))\",0,2.6,Zone1,Bathroom,619312,12
apt-1,separator,WALL,\"POLYGON ((0 -0.1, 6 -0.1, 6 0.1, 0 0.1, 0 -0.1))\",0,2.6,,,,12
apt-1,separator,WALL,\"POLYGON ((-0.1 0, 0.1 0, 0.1 3, -0.1 3, -0.1 0))\",0,2.6,,,,12
apt-1,opening,DOOR,\"POLYGON ((1 -0.1, 2 -0.1, 2 0.1, 1 0.1, 1 -0.1))\",0,2.0,,,,12
apt-1,opening,WINDOW,\"POLYGON ((-0.1 1, 0.1 1, 0.1 2, -0.1 2, -0.1 1))\",0.9,1.2,,,,12
";

fn category_counts(elements: &[SceneElement]) -> (usize, usize, usize) {
    (
        elements.iter().filter(|e| e.is_wall()).count(),
        elements.iter().filter(|e| e.is_door()).count(),
        elements.iter().filter(|e| e.is_window()).count(),
    )
}

fn dataset() -> ApartmentDataset {
    ApartmentDataset::from_reader(DATASET.as_bytes()).unwrap()
}

#[test]
fn bedroom_flat_and_extruded() {
    let record = dataset().apartment("apt-1").unwrap();
    let bedroom = record_metadata(&record).remove(0);

    let flat = build_elements(vec![bedroom.clone()], BuildMode::Flat);
    assert_eq!(flat[0].mesh.vertex_count(), 4);
    assert_eq!(flat[0].mesh.triangle_count(), 2);
    assert_eq!(flat[0].style, style_for(&bedroom.entity_subtype));
    assert_eq!(flat[0].style.color, [0.9, 1.0, 0.9, 1.0]);

    let solid = build_elements(vec![bedroom], BuildMode::Extruded);
    assert_eq!(solid[0].mesh.vertex_count(), 8);
    assert_eq!(solid[0].mesh.triangle_count(), 12);
    assert_eq!(solid[0].name, "area_0_BEDROOM_619311");
}

#[test]
fn polygon_payload_matches_record() {
    let record = dataset().apartment("apt-1").unwrap();
    let from_record = build_elements(record_metadata(&record), BuildMode::Flat);
    let from_payload = build_elements(polygons_metadata(&record.to_polygons()), BuildMode::Flat);

    let names = |elements: &[SceneElement]| elements.iter().map(|e| e.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&from_record), names(&from_payload));
}

#[test]
fn mode_rebuild_preserves_categories() {
    let record = dataset().apartment("apt-1").unwrap();
    let metadata = record_metadata(&record);

    let plan = build_elements(metadata.clone(), BuildMode::Flat);
    let perspective = build_elements(metadata.clone(), BuildMode::Extruded);
    let plan_again = build_elements(metadata, BuildMode::Flat);

    assert_eq!(plan.len(), 6);
    assert_eq!(perspective.len(), plan.len());
    assert_eq!(plan_again.len(), plan.len());
    assert_eq!(category_counts(&plan), (2, 1, 1));
    assert_eq!(category_counts(&plan_again), category_counts(&plan));
}

#[test]
fn aligned_scene_is_grounded_and_centered() {
    let record = dataset().apartment("apt-1").unwrap();
    let mut elements = build_elements(record_metadata(&record), BuildMode::Extruded);
    let transform = align_scene(&mut elements);
    assert_relative_eq!(transform.rotation, 0.0, epsilon = 1e-9);

    let bounds = scene_bounds(&elements);
    assert_relative_eq!(bounds.min.z, 0.0, epsilon = 1e-5);
    assert_relative_eq!(bounds.center().x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(bounds.center().y, 0.0, epsilon = 1e-5);

    // Aligning again changes nothing
    let again = align_scene(&mut elements);
    assert_relative_eq!(again.rotation, 0.0, epsilon = 1e-9);
    assert_relative_eq!(again.translation.norm(), 0.0, epsilon = 1e-5);
}

#[test]
fn glb_contains_every_element() {
    let record = dataset().apartment("apt-1").unwrap();
    let mut elements = build_elements(record_metadata(&record), BuildMode::Extruded);
    align_scene(&mut elements);

    let glb = encode_glb(&elements, &record.apartment_id).unwrap();
    assert_eq!(&glb[..4], b"glTF");

    let json_len = u32::from_le_bytes([glb[12], glb[13], glb[14], glb[15]]) as usize;
    let doc: serde_json::Value = serde_json::from_slice(&glb[20..20 + json_len]).unwrap();
    assert_eq!(doc["nodes"].as_array().unwrap().len(), 6);
    assert_eq!(doc["nodes"][5]["name"], "opening_1_WINDOW_5");
    assert_eq!(doc["nodes"][5]["extras"]["elevation"], 0.9);
}
