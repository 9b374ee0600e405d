// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apartment data model shared by the server and the viewer.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Default extrusion height (m) when the dataset leaves it blank
pub const DEFAULT_HEIGHT: f64 = 2.6;

/// Default base elevation (m) when the dataset leaves it blank
pub const DEFAULT_ELEVATION: f64 = 0.0;

/// Top-level element category of a dataset row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Room or other floor area
    Area,
    /// Wall
    Separator,
    /// Door or window
    Opening,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Area, EntityKind::Separator, EntityKind::Opening];

    /// Parse the dataset's `entity_type` column
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "area" => Some(EntityKind::Area),
            "separator" => Some(EntityKind::Separator),
            "opening" => Some(EntityKind::Opening),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Area => "area",
            EntityKind::Separator => "separator",
            EntityKind::Opening => "opening",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element subtype (room type, wall, door, window...)
///
/// Known dataset tags get their own variant; anything else is kept verbatim
/// in [`Subtype::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Subtype {
    Bathroom,
    LivingRoom,
    Kitchen,
    Room,
    Bedroom,
    Balcony,
    Corridor,
    Shaft,
    Dining,
    Wall,
    Door,
    Window,
    EntranceDoor,
    Other(String),
}

impl Subtype {
    /// Parse an upper-case dataset tag
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "BATHROOM" => Subtype::Bathroom,
            "LIVING_ROOM" => Subtype::LivingRoom,
            "KITCHEN" => Subtype::Kitchen,
            "ROOM" => Subtype::Room,
            "BEDROOM" => Subtype::Bedroom,
            "BALCONY" => Subtype::Balcony,
            "CORRIDOR" => Subtype::Corridor,
            "SHAFT" => Subtype::Shaft,
            "DINING" => Subtype::Dining,
            "WALL" => Subtype::Wall,
            "DOOR" => Subtype::Door,
            "WINDOW" => Subtype::Window,
            "ENTRANCE_DOOR" => Subtype::EntranceDoor,
            other => Subtype::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Subtype::Bathroom => "BATHROOM",
            Subtype::LivingRoom => "LIVING_ROOM",
            Subtype::Kitchen => "KITCHEN",
            Subtype::Room => "ROOM",
            Subtype::Bedroom => "BEDROOM",
            Subtype::Balcony => "BALCONY",
            Subtype::Corridor => "CORRIDOR",
            Subtype::Shaft => "SHAFT",
            Subtype::Dining => "DINING",
            Subtype::Wall => "WALL",
            Subtype::Door => "DOOR",
            Subtype::Window => "WINDOW",
            Subtype::EntranceDoor => "ENTRANCE_DOOR",
            Subtype::Other(tag) => tag,
        }
    }

    #[inline]
    pub fn is_door(&self) -> bool {
        matches!(self, Subtype::Door | Subtype::EntranceDoor)
    }

    #[inline]
    pub fn is_window(&self) -> bool {
        matches!(self, Subtype::Window)
    }
}

impl From<String> for Subtype {
    fn from(value: String) -> Self {
        Subtype::parse(&value)
    }
}

impl From<Subtype> for String {
    fn from(value: Subtype) -> Self {
        match value {
            Subtype::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed dataset row belonging to an apartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentEntity {
    pub entity_type: EntityKind,
    pub entity_subtype: Subtype,
    /// Exterior ring as stored in the source (usually closed)
    pub coordinates: Vec<[f64; 2]>,
    pub elevation: f64,
    pub height: f64,
    pub zoning: Option<String>,
    pub roomtype: Option<String>,
    pub area_id: Option<i64>,
    pub unit_id: Option<i64>,
}

impl ApartmentEntity {
    /// Geometry was a polygon with a usable ring
    pub fn has_polygon(&self) -> bool {
        !self.coordinates.is_empty()
    }

    /// Convert to the wire format used by the polygon endpoint
    ///
    /// Only areas carry `id`, `roomtype` and `zoning`.
    pub fn to_polygon_record(&self) -> PolygonRecord {
        let is_area = self.entity_type == EntityKind::Area;
        PolygonRecord {
            coordinates: self.coordinates.clone(),
            elevation: self.elevation,
            height: self.height,
            subtype: self.entity_subtype.clone(),
            id: if is_area { self.area_id } else { None },
            roomtype: if is_area { self.roomtype.clone() } else { None },
            zoning: if is_area { self.zoning.clone() } else { None },
        }
    }
}

/// All entities of one apartment, grouped by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentRecord {
    pub apartment_id: String,
    pub areas: Vec<ApartmentEntity>,
    pub separators: Vec<ApartmentEntity>,
    pub openings: Vec<ApartmentEntity>,
}

impl ApartmentRecord {
    pub fn new(apartment_id: impl Into<String>) -> Self {
        Self {
            apartment_id: apartment_id.into(),
            areas: Vec::new(),
            separators: Vec::new(),
            openings: Vec::new(),
        }
    }

    pub fn push(&mut self, entity: ApartmentEntity) {
        match entity.entity_type {
            EntityKind::Area => self.areas.push(entity),
            EntityKind::Separator => self.separators.push(entity),
            EntityKind::Opening => self.openings.push(entity),
        }
    }

    pub fn entities(&self, kind: EntityKind) -> &[ApartmentEntity] {
        match kind {
            EntityKind::Area => &self.areas,
            EntityKind::Separator => &self.separators,
            EntityKind::Opening => &self.openings,
        }
    }

    pub fn total_elements(&self) -> usize {
        self.areas.len() + self.separators.len() + self.openings.len()
    }

    /// Polygon payload for client-side extrusion
    pub fn to_polygons(&self) -> ApartmentPolygons {
        let convert = |list: &[ApartmentEntity]| {
            list.iter()
                .map(ApartmentEntity::to_polygon_record)
                .collect::<Vec<_>>()
        };

        ApartmentPolygons {
            apartment_id: self.apartment_id.clone(),
            areas: convert(&self.areas),
            separators: convert(&self.separators),
            openings: convert(&self.openings),
        }
    }

    pub fn statistics(&self) -> ApartmentStatistics {
        let mut room_types: Vec<String> = self
            .areas
            .iter()
            .filter_map(|a| a.roomtype.clone())
            .filter(|r| !r.is_empty())
            .collect();
        room_types.sort();
        room_types.dedup();

        ApartmentStatistics {
            apartment_id: self.apartment_id.clone(),
            num_areas: self.areas.len(),
            num_separators: self.separators.len(),
            num_openings: self.openings.len(),
            total_elements: self.total_elements(),
            room_types,
        }
    }
}

/// A single 2D outline with its vertical placement, as sent to the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRecord {
    /// Plan coordinates; extra ordinates such as Z are dropped on input
    #[serde(deserialize_with = "deserialize_plan_points")]
    pub coordinates: Vec<[f64; 2]>,
    #[serde(default)]
    pub elevation: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(rename = "type")]
    pub subtype: Subtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roomtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoning: Option<String>,
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

/// Accept `[x, y]`, `[x, y, z]` or longer points, keeping `x` and `y`
///
/// Points with fewer than two ordinates are skipped; the ring then falls
/// through the degenerate-polygon path instead of failing the payload.
fn deserialize_plan_points<'de, D>(deserializer: D) -> std::result::Result<Vec<[f64; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let points = Vec::<Vec<f64>>::deserialize(deserializer)?;
    Ok(points
        .into_iter()
        .filter_map(|point| match point.as_slice() {
            [x, y, ..] => Some([*x, *y]),
            _ => None,
        })
        .collect())
}

/// Polygon payload of one apartment (`GET /apartment/{id}/polygons`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentPolygons {
    pub apartment_id: String,
    #[serde(default)]
    pub areas: Vec<PolygonRecord>,
    #[serde(default)]
    pub separators: Vec<PolygonRecord>,
    #[serde(default)]
    pub openings: Vec<PolygonRecord>,
}

impl ApartmentPolygons {
    pub fn records(&self, kind: EntityKind) -> &[PolygonRecord] {
        match kind {
            EntityKind::Area => &self.areas,
            EntityKind::Separator => &self.separators,
            EntityKind::Opening => &self.openings,
        }
    }

    pub fn len(&self) -> usize {
        self.areas.len() + self.separators.len() + self.openings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Apartment id listing (`GET /apartments`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentList {
    pub apartment_ids: Vec<String>,
    pub total: usize,
}

impl ApartmentList {
    pub fn new(apartment_ids: Vec<String>) -> Self {
        let total = apartment_ids.len();
        Self { apartment_ids, total }
    }
}

/// Per-apartment element counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentStatistics {
    pub apartment_id: String,
    pub num_areas: usize,
    pub num_separators: usize,
    pub num_openings: usize,
    pub total_elements: usize,
    pub room_types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(kind: EntityKind, subtype: &str) -> ApartmentEntity {
        ApartmentEntity {
            entity_type: kind,
            entity_subtype: Subtype::parse(subtype),
            coordinates: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
            elevation: 0.0,
            height: DEFAULT_HEIGHT,
            zoning: Some("ZONE1".into()),
            roomtype: Some("Bedroom".into()),
            area_id: Some(42),
            unit_id: None,
        }
    }

    #[test]
    fn test_subtype_parse_known_and_unknown() {
        assert_eq!(Subtype::parse("BEDROOM"), Subtype::Bedroom);
        assert_eq!(Subtype::parse(" ENTRANCE_DOOR "), Subtype::EntranceDoor);
        assert_eq!(Subtype::parse("STOREROOM"), Subtype::Other("STOREROOM".into()));
        assert_eq!(Subtype::parse("STOREROOM").as_str(), "STOREROOM");
        assert!(Subtype::EntranceDoor.is_door());
        assert!(!Subtype::Window.is_door());
    }

    #[test]
    fn test_subtype_serializes_as_tag() {
        let json = serde_json::to_string(&Subtype::LivingRoom).unwrap();
        assert_eq!(json, "\"LIVING_ROOM\"");
        let back: Subtype = serde_json::from_str("\"WINDOW\"").unwrap();
        assert_eq!(back, Subtype::Window);
    }

    #[test]
    fn test_polygon_record_only_areas_carry_ids() {
        let area = entity(EntityKind::Area, "BEDROOM").to_polygon_record();
        assert_eq!(area.id, Some(42));
        assert_eq!(area.zoning.as_deref(), Some("ZONE1"));

        let wall = entity(EntityKind::Separator, "WALL").to_polygon_record();
        assert_eq!(wall.id, None);
        assert_eq!(wall.roomtype, None);

        let json = serde_json::to_value(&wall).unwrap();
        assert_eq!(json["type"], "WALL");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_record_statistics() {
        let mut record = ApartmentRecord::new("apt-1");
        record.push(entity(EntityKind::Area, "BEDROOM"));
        record.push(entity(EntityKind::Area, "KITCHEN"));
        record.push(entity(EntityKind::Separator, "WALL"));
        record.push(entity(EntityKind::Opening, "DOOR"));

        let stats = record.statistics();
        assert_eq!(stats.num_areas, 2);
        assert_eq!(stats.num_separators, 1);
        assert_eq!(stats.num_openings, 1);
        assert_eq!(stats.total_elements, 4);
        assert_eq!(stats.room_types, vec!["Bedroom".to_string()]);
    }

    #[test]
    fn test_polygon_record_accepts_3d_points() {
        let record: PolygonRecord = serde_json::from_str(
            r#"{"coordinates": [[0,0,0],[4,0,0],[4,3,0.5],[0,3]], "type": "BEDROOM"}"#,
        )
        .unwrap();
        assert_eq!(
            record.coordinates,
            vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]]
        );

        let short: PolygonRecord =
            serde_json::from_str(r#"{"coordinates": [[1],[0,0],[1,0],[1,1]], "type": "WALL"}"#)
                .unwrap();
        assert_eq!(short.coordinates.len(), 3);
    }

    #[test]
    fn test_polygons_payload_with_3d_points() {
        let json = r#"{
            "apartment_id": "apt-z",
            "areas": [{"coordinates": [[0,0,2.5],[4,0,2.5],[4,3,2.5]], "elevation": 2.5, "height": 2.6, "type": "KITCHEN", "id": 7}],
            "separators": [{"coordinates": [[0,0,0],[4,0,0],[4,0.2,0],[0,0.2,0]], "type": "WALL"}]
        }"#;
        let polygons: ApartmentPolygons = serde_json::from_str(json).unwrap();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons.areas[0].coordinates[1], [4.0, 0.0]);
        assert!(polygons.openings.is_empty());
    }

    #[test]
    fn test_polygon_record_defaults() {
        let record: PolygonRecord =
            serde_json::from_str(r#"{"coordinates": [[0,0],[1,0],[1,1]], "type": "DOOR"}"#).unwrap();
        assert_eq!(record.elevation, 0.0);
        assert_eq!(record.height, DEFAULT_HEIGHT);
        assert_eq!(record.subtype, Subtype::Door);
    }
}
