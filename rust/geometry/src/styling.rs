// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Category styling: display color and opacity per element subtype

use homecraft_core::{EntityKind, Subtype};

/// RGBA color in 0-1 range
pub type Rgba = [f32; 4];

pub const DEFAULT_COLOR: Rgba = [0.8, 0.8, 0.8, 1.0];

/// Opacity applied to windows
pub const WINDOW_OPACITY: f32 = 0.5;

/// Display style of one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub color: Rgba,
}

impl ElementStyle {
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.color[3]
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.color[3] < 1.0
    }
}

fn subtype_color(subtype: &Subtype) -> Option<Rgba> {
    let color = match subtype {
        Subtype::Bathroom => [0.7, 0.9, 1.0, 1.0],
        Subtype::LivingRoom => [1.0, 0.9, 0.7, 1.0],
        Subtype::Kitchen => [1.0, 0.8, 0.8, 1.0],
        Subtype::Room | Subtype::Bedroom => [0.9, 1.0, 0.9, 1.0],
        Subtype::Balcony => [0.8, 0.8, 1.0, 1.0],
        Subtype::Corridor => [0.95, 0.95, 0.95, 1.0],
        Subtype::Shaft => [0.6, 0.6, 0.6, 1.0],
        Subtype::Dining => [1.0, 0.95, 0.8, 1.0],
        Subtype::Wall => [0.5, 0.5, 0.5, 1.0],
        Subtype::Door => [0.6, 0.4, 0.2, 1.0],
        Subtype::Window => [0.7, 0.9, 1.0, WINDOW_OPACITY],
        Subtype::EntranceDoor => [0.4, 0.3, 0.2, 1.0],
        Subtype::Other(_) => return None,
    };
    Some(color)
}

/// Resolve the style of an element from its subtype tag
///
/// Unrecognised tags get [`DEFAULT_COLOR`] whatever their entity kind, so an
/// untagged separator is not drawn as a wall.
pub fn style_for(subtype: &Subtype) -> ElementStyle {
    let color = subtype_color(subtype).unwrap_or(DEFAULT_COLOR);
    ElementStyle { color }
}

/// Z offset of each category in plan view
pub fn plan_layer_offset(kind: EntityKind) -> f64 {
    match kind {
        EntityKind::Area => 0.0,
        EntityKind::Separator => 0.01,
        EntityKind::Opening => 0.02,
    }
}
