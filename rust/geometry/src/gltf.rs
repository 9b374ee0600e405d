// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary glTF 2.0 (GLB) export
//!
//! Layout: 12-byte header, a JSON chunk padded with spaces and a BIN chunk
//! padded with zeros, both to 4 bytes. Every non-empty element becomes one
//! node with one mesh; its metadata goes into the node `extras`. The scene is
//! Z-up and glTF is Y-up, so vertices are written as `(x, z, -y)`.

use crate::scene::SceneElement;
use crate::{Error, Result};
use serde::Serialize;

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;
const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

const COMPONENT_FLOAT: u32 = 5126;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const MODE_TRIANGLES: u32 = 4;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    asset: Asset,
    scene: usize,
    scenes: Vec<Scene>,
    nodes: Vec<Node>,
    meshes: Vec<MeshDef>,
    materials: Vec<Material>,
    accessors: Vec<Accessor>,
    buffer_views: Vec<BufferView>,
    buffers: Vec<Buffer>,
}

#[derive(Serialize)]
struct Asset {
    version: &'static str,
    generator: String,
}

#[derive(Serialize)]
struct Scene {
    name: String,
    nodes: Vec<usize>,
}

#[derive(Serialize)]
struct Node {
    name: String,
    mesh: usize,
    extras: serde_json::Value,
}

#[derive(Serialize)]
struct MeshDef {
    name: String,
    primitives: Vec<Primitive>,
}

#[derive(Serialize)]
struct Primitive {
    attributes: Attributes,
    indices: usize,
    material: usize,
    mode: u32,
}

#[derive(Serialize)]
struct Attributes {
    #[serde(rename = "POSITION")]
    position: usize,
    #[serde(rename = "NORMAL")]
    normal: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Material {
    name: String,
    pbr_metallic_roughness: PbrMetallicRoughness,
    alpha_mode: &'static str,
    double_sided: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PbrMetallicRoughness {
    base_color_factor: [f32; 4],
    metallic_factor: f32,
    roughness_factor: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Accessor {
    buffer_view: usize,
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<[f32; 3]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferView {
    buffer: usize,
    byte_offset: usize,
    byte_length: usize,
    target: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Buffer {
    byte_length: usize,
}

/// Accumulates the BIN chunk and the views into it
struct BinaryBuilder {
    data: Vec<u8>,
    views: Vec<BufferView>,
}

impl BinaryBuilder {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            views: Vec::new(),
        }
    }

    fn push_view(&mut self, bytes: &[u8], target: u32) -> usize {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        self.views.push(BufferView {
            buffer: 0,
            byte_offset: offset,
            byte_length: bytes.len(),
            target,
        });
        self.views.len() - 1
    }
}

/// Swap a Z-up triple into glTF's Y-up frame
#[inline]
fn to_y_up(v: &[f32]) -> [f32; 3] {
    [v[0], v[2], -v[1]]
}

fn vec3_bytes(values: &[f32]) -> (Vec<u8>, [f32; 3], [f32; 3]) {
    let mut bytes = Vec::with_capacity(values.len() * 4);
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];

    for chunk in values.chunks_exact(3) {
        let v = to_y_up(chunk);
        for axis in 0..3 {
            min[axis] = min[axis].min(v[axis]);
            max[axis] = max[axis].max(v[axis]);
            bytes.extend_from_slice(&v[axis].to_le_bytes());
        }
    }

    (bytes, min, max)
}

fn material_index(
    materials: &mut Vec<Material>,
    keys: &mut Vec<([u32; 4], bool)>,
    element: &SceneElement,
) -> usize {
    let color = element.style.color;
    let key = (color.map(f32::to_bits), element.double_sided);
    if let Some(found) = keys.iter().position(|k| *k == key) {
        return found;
    }

    keys.push(key);
    materials.push(Material {
        name: format!("{}_{}", element.kind(), element.subtype()),
        pbr_metallic_roughness: PbrMetallicRoughness {
            base_color_factor: color,
            metallic_factor: 0.0,
            roughness_factor: 1.0,
        },
        alpha_mode: if element.style.is_transparent() { "BLEND" } else { "OPAQUE" },
        double_sided: element.double_sided,
    });
    materials.len() - 1
}

/// Encode scene elements into a GLB file
///
/// Elements with empty meshes are skipped. Fails when nothing is left.
pub fn encode_glb(elements: &[SceneElement], scene_name: &str) -> Result<Vec<u8>> {
    let mut bin = BinaryBuilder::new();
    let mut nodes = Vec::new();
    let mut meshes = Vec::new();
    let mut materials = Vec::new();
    let mut material_keys = Vec::new();
    let mut accessors = Vec::new();

    for element in elements.iter().filter(|e| !e.mesh.is_empty()) {
        let mesh = &element.mesh;

        let (position_bytes, min, max) = vec3_bytes(&mesh.positions);
        let (normal_bytes, _, _) = vec3_bytes(&mesh.normals);
        let index_bytes: Vec<u8> = mesh.indices.iter().flat_map(|i| i.to_le_bytes()).collect();

        let position_view = bin.push_view(&position_bytes, TARGET_ARRAY_BUFFER);
        let normal_view = bin.push_view(&normal_bytes, TARGET_ARRAY_BUFFER);
        let index_view = bin.push_view(&index_bytes, TARGET_ELEMENT_ARRAY_BUFFER);

        let position = accessors.len();
        accessors.push(Accessor {
            buffer_view: position_view,
            component_type: COMPONENT_FLOAT,
            count: mesh.vertex_count(),
            kind: "VEC3",
            min: Some(min),
            max: Some(max),
        });
        accessors.push(Accessor {
            buffer_view: normal_view,
            component_type: COMPONENT_FLOAT,
            count: mesh.vertex_count(),
            kind: "VEC3",
            min: None,
            max: None,
        });
        accessors.push(Accessor {
            buffer_view: index_view,
            component_type: COMPONENT_UNSIGNED_INT,
            count: mesh.indices.len(),
            kind: "SCALAR",
            min: None,
            max: None,
        });

        let material = material_index(&mut materials, &mut material_keys, element);

        meshes.push(MeshDef {
            name: element.name.clone(),
            primitives: vec![Primitive {
                attributes: Attributes {
                    position,
                    normal: position + 1,
                },
                indices: position + 2,
                material,
                mode: MODE_TRIANGLES,
            }],
        });
        nodes.push(Node {
            name: element.name.clone(),
            mesh: meshes.len() - 1,
            extras: serde_json::to_value(&element.metadata)?,
        });
    }

    if nodes.is_empty() {
        return Err(Error::EmptyScene(format!(
            "{} has no elements with geometry",
            scene_name
        )));
    }

    while bin.data.len() % 4 != 0 {
        bin.data.push(0);
    }

    let document = Document {
        asset: Asset {
            version: "2.0",
            generator: format!("homecraft-geometry {}", env!("CARGO_PKG_VERSION")),
        },
        scene: 0,
        scenes: vec![Scene {
            name: scene_name.to_string(),
            nodes: (0..nodes.len()).collect(),
        }],
        nodes,
        meshes,
        materials,
        accessors,
        buffers: vec![Buffer {
            byte_length: bin.data.len(),
        }],
        buffer_views: bin.views,
    };

    let mut json = serde_json::to_vec(&document)?;
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = HEADER_LEN + CHUNK_HEADER_LEN + json.len() + CHUNK_HEADER_LEN + bin.data.len();
    let total_u32 = u32::try_from(total).map_err(|_| Error::BufferOverflow(total))?;

    let mut output = Vec::with_capacity(total);
    output.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    output.extend_from_slice(&GLB_VERSION.to_le_bytes());
    output.extend_from_slice(&total_u32.to_le_bytes());

    output.extend_from_slice(&(json.len() as u32).to_le_bytes());
    output.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    output.extend_from_slice(&json);

    output.extend_from_slice(&(bin.data.len() as u32).to_le_bytes());
    output.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    output.extend_from_slice(&bin.data);

    tracing::debug!(
        nodes = document.nodes.len(),
        materials = document.materials.len(),
        bytes = output.len(),
        "Encoded GLB"
    );

    Ok(output)
}
