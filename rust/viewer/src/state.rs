// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer state machine
//!
//! A [`Viewer`] owns the scene for one apartment: its elements, the scene
//! helpers, the camera, the current selection and the error banner. The host
//! drives it from its event loop and asks for a [`Frame`] each animation
//! frame.

use crate::camera::OrbitCamera;
use crate::loader::CancellationToken;
use crate::picking::pick;
use homecraft_core::ApartmentPolygons;
use homecraft_geometry::{
    align_scene, build_elements, polygons_metadata, scene_bounds, AlignmentTransform, BuildMode,
    ElementMetadata, Matrix4, Mesh, Rgba, SceneElement,
};

/// Projection mode of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Orthographic top-down view of flat polygons
    #[default]
    Plan,
    Perspective,
    Isometric,
}

impl ViewMode {
    /// Plan shows flat polygons, the 3D modes show extrusions
    pub fn build_mode(&self) -> BuildMode {
        match self {
            ViewMode::Plan => BuildMode::Flat,
            ViewMode::Perspective | ViewMode::Isometric => BuildMode::Extruded,
        }
    }
}

/// Visibility switches exposed to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Walls,
    Doors,
    Windows,
    Grid,
    Axes,
    Gizmo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub walls: bool,
    pub doors: bool,
    pub windows: bool,
    pub grid: bool,
    pub axes: bool,
    pub gizmo: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            walls: true,
            doors: true,
            windows: true,
            grid: true,
            axes: true,
            gizmo: true,
        }
    }
}

impl Visibility {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Walls => self.walls,
            Toggle::Doors => self.doors,
            Toggle::Windows => self.windows,
            Toggle::Grid => self.grid,
            Toggle::Axes => self.axes,
            Toggle::Gizmo => self.gizmo,
        }
    }

    fn set(&mut self, toggle: Toggle, visible: bool) {
        match toggle {
            Toggle::Walls => self.walls = visible,
            Toggle::Doors => self.doors = visible,
            Toggle::Windows => self.windows = visible,
            Toggle::Grid => self.grid = visible,
            Toggle::Axes => self.axes = visible,
            Toggle::Gizmo => self.gizmo = visible,
        }
    }

    /// Whether an element passes the category toggles
    pub fn shows(&self, element: &SceneElement) -> bool {
        if element.is_wall() {
            self.walls
        } else if element.is_door() {
            self.doors
        } else if element.is_window() {
            self.windows
        } else {
            true
        }
    }
}

/// Non-pickable scene decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    Grid,
    Axes,
    Gizmo,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helper {
    pub kind: HelperKind,
    /// Edge length (grid) or axis length in world units
    pub size: f64,
    pub enabled: bool,
}

impl Helper {
    fn new(kind: HelperKind, enabled: bool) -> Self {
        Self {
            kind,
            size: 1.0,
            enabled,
        }
    }
}

/// Immutable polygon payload of one apartment
#[derive(Debug, Clone, PartialEq)]
pub struct ApartmentSnapshot {
    polygons: ApartmentPolygons,
}

impl ApartmentSnapshot {
    pub fn new(polygons: ApartmentPolygons) -> Self {
        Self { polygons }
    }

    pub fn apartment_id(&self) -> &str {
        &self.polygons.apartment_id
    }

    pub fn polygons(&self) -> &ApartmentPolygons {
        &self.polygons
    }
}

/// A scene element plus its render switch
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub element: SceneElement,
    pub enabled: bool,
}

impl SceneNode {
    /// Visible with geometry to hit
    pub fn is_pickable(&self) -> bool {
        self.enabled && !self.element.mesh.is_empty()
    }
}

/// The selected element and the contents of the metadata panel
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub index: usize,
    pub name: String,
    pub metadata: ElementMetadata,
}

impl Selection {
    /// Label/value rows for the metadata panel
    pub fn panel_rows(&self) -> Vec<(&'static str, String)> {
        let m = &self.metadata;
        let optional = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

        let coordinates = m
            .coordinates
            .iter()
            .map(|c| format!("({:.3}, {:.3})", c[0], c[1]))
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            ("name", self.name.clone()),
            ("entity_type", m.entity_type.to_string()),
            ("entity_subtype", m.entity_subtype.to_string()),
            ("roomtype", optional(m.roomtype.clone())),
            ("zoning", optional(m.zoning.clone())),
            ("elevation", format!("{:.2}", m.elevation)),
            ("height", format!("{:.2}", m.height)),
            ("area_id", optional(m.area_id.map(|id| id.to_string()))),
            ("unit_id", optional(m.unit_id.map(|id| id.to_string()))),
            ("coordinates", coordinates),
        ]
    }
}

/// One mesh to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem<'a> {
    pub name: &'a str,
    pub mesh: &'a Mesh,
    pub color: Rgba,
    pub double_sided: bool,
    pub highlighted: bool,
}

/// Everything the host needs to draw one animation frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub items: Vec<DrawItem<'a>>,
    pub helpers: Vec<Helper>,
    pub view: Matrix4<f64>,
    pub projection: Matrix4<f64>,
}

/// Interactive viewer for one apartment
#[derive(Debug)]
pub struct Viewer {
    mode: ViewMode,
    visibility: Visibility,
    snapshot: Option<ApartmentSnapshot>,
    nodes: Vec<SceneNode>,
    selection: Option<Selection>,
    camera: Option<OrbitCamera>,
    helpers: Vec<Helper>,
    alignment: AlignmentTransform,
    error: Option<String>,
    cancel: CancellationToken,
    disposed: bool,
}

impl Viewer {
    /// Plan mode, every toggle on, nothing selected
    pub fn new(aspect: f64) -> Self {
        let mut camera = OrbitCamera::new(aspect);
        camera.configure(ViewMode::Plan);

        Self {
            mode: ViewMode::Plan,
            visibility: Visibility::default(),
            snapshot: None,
            nodes: Vec::new(),
            selection: None,
            camera: Some(camera),
            helpers: Vec::new(),
            alignment: AlignmentTransform::identity(),
            error: None,
            cancel: CancellationToken::new(),
            disposed: false,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn snapshot(&self) -> Option<&ApartmentSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn camera(&self) -> Option<&OrbitCamera> {
        self.camera.as_ref()
    }

    pub fn helpers(&self) -> &[Helper] {
        &self.helpers
    }

    pub fn alignment(&self) -> &AlignmentTransform {
        &self.alignment
    }

    /// Message shown in the error banner
    pub fn error_banner(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(error = %message, "Viewer error");
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Token shared with in-flight loads; cancelled on [`Viewer::dispose`]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Replace the displayed apartment
    pub fn set_snapshot(&mut self, snapshot: ApartmentSnapshot) {
        if self.disposed {
            tracing::debug!("Ignoring snapshot for disposed viewer");
            return;
        }
        tracing::info!(
            apartment_id = snapshot.apartment_id(),
            records = snapshot.polygons().len(),
            "Showing apartment"
        );
        self.snapshot = Some(snapshot);
        self.error = None;
        self.rebuild();
    }

    /// Switch projection, regenerating every mesh
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.disposed || mode == self.mode {
            return;
        }
        tracing::debug!(from = ?self.mode, to = ?mode, "Switching view mode");
        self.mode = mode;
        self.rebuild();
    }

    /// Dispose meshes and build them again for the current mode
    fn rebuild(&mut self) {
        self.nodes.clear();
        self.selection = None;

        let Some(snapshot) = &self.snapshot else {
            self.alignment = AlignmentTransform::identity();
            return;
        };

        let mut elements = build_elements(
            polygons_metadata(snapshot.polygons()),
            self.mode.build_mode(),
        );
        self.alignment = align_scene(&mut elements);

        let bounds = scene_bounds(&elements);
        self.nodes = elements
            .into_iter()
            .map(|element| SceneNode {
                enabled: self.visibility.shows(&element),
                element,
            })
            .collect();

        let helper_size = if bounds.is_empty() {
            1.0
        } else {
            bounds.extent().x.max(bounds.extent().y) * 1.5
        };
        if self.helpers.is_empty() {
            self.helpers = vec![
                Helper::new(HelperKind::Grid, self.visibility.grid),
                Helper::new(HelperKind::Axes, self.visibility.axes),
                Helper::new(HelperKind::Gizmo, self.visibility.gizmo),
            ];
        }
        for helper in &mut self.helpers {
            helper.size = helper_size;
        }

        if let Some(camera) = &mut self.camera {
            camera.frame(&bounds, self.mode);
        }
    }

    /// Flip one toggle
    pub fn toggle(&mut self, toggle: Toggle) {
        let visible = !self.visibility.get(toggle);
        self.set_visible(toggle, visible);
    }

    pub fn set_visible(&mut self, toggle: Toggle, visible: bool) {
        if self.disposed {
            return;
        }
        match toggle {
            Toggle::Walls | Toggle::Doors | Toggle::Windows => {
                self.visibility.set(toggle, visible);
                self.apply_category_visibility();
            }
            Toggle::Grid => self.set_helper_visible(HelperKind::Grid, toggle, visible),
            Toggle::Axes => self.set_helper_visible(HelperKind::Axes, toggle, visible),
            Toggle::Gizmo => self.set_helper_visible(HelperKind::Gizmo, toggle, visible),
        }
    }

    fn apply_category_visibility(&mut self) {
        for node in &mut self.nodes {
            node.enabled = self.visibility.shows(&node.element);
        }

        let hidden = self
            .selection
            .as_ref()
            .is_some_and(|s| self.nodes.get(s.index).map_or(true, |n| !n.enabled));
        if hidden {
            self.selection = None;
        }
    }

    fn set_helper_visible(&mut self, kind: HelperKind, toggle: Toggle, visible: bool) {
        let Some(helper) = self.helpers.iter_mut().find(|h| h.kind == kind) else {
            tracing::debug!(?kind, "Helper missing, toggle ignored");
            return;
        };
        helper.enabled = visible;
        self.visibility.set(toggle, visible);
    }

    /// Select by node index; hidden or empty nodes cannot be selected
    pub fn select(&mut self, index: usize) -> Option<&Selection> {
        let node = self.nodes.get(index).filter(|n| n.is_pickable())?;
        self.selection = Some(Selection {
            index,
            name: node.element.name.clone(),
            metadata: node.element.metadata.clone(),
        });
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Pointer-down hit test at normalized device coordinates
    ///
    /// A hit replaces the selection, a miss clears it.
    pub fn pointer_down(&mut self, ndc_x: f64, ndc_y: f64) -> Option<&Selection> {
        let Some(camera) = &self.camera else {
            tracing::debug!("No camera, pointer ignored");
            return None;
        };
        let ray = camera.ray_from_ndc(ndc_x, ndc_y)?;

        let candidates = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_pickable())
            .map(|(i, n)| (i, &n.element.mesh));

        match pick(&ray, candidates) {
            Some(hit) => self.select(hit.index),
            None => {
                self.selection = None;
                None
            }
        }
    }

    pub fn orbit(&mut self, delta_yaw: f64, delta_pitch: f64) {
        match &mut self.camera {
            Some(camera) => camera.orbit(delta_yaw, delta_pitch),
            None => tracing::debug!("No camera, orbit ignored"),
        }
    }

    pub fn pan(&mut self, right: f64, up: f64) {
        match &mut self.camera {
            Some(camera) => camera.pan(right, up),
            None => tracing::debug!("No camera, pan ignored"),
        }
    }

    pub fn zoom(&mut self, factor: f64) {
        match &mut self.camera {
            Some(camera) => camera.zoom(factor),
            None => tracing::debug!("No camera, zoom ignored"),
        }
    }

    pub fn resize(&mut self, aspect: f64) {
        if let Some(camera) = &mut self.camera {
            camera.set_aspect(aspect);
        }
    }

    /// Draw list for one animation frame; `None` once disposed
    pub fn render_frame(&self) -> Option<Frame<'_>> {
        if self.disposed {
            return None;
        }
        let camera = self.camera.as_ref()?;
        let selected = self.selection.as_ref().map(|s| s.index);

        let items = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.enabled && !n.element.mesh.is_empty())
            .map(|(i, n)| DrawItem {
                name: &n.element.name,
                mesh: &n.element.mesh,
                color: n.element.style.color,
                double_sided: n.element.double_sided,
                highlighted: selected == Some(i),
            })
            .collect();

        Some(Frame {
            items,
            helpers: self.helpers.iter().filter(|h| h.enabled).copied().collect(),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
        })
    }

    /// Release meshes, helpers and camera and cancel pending loads
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel.cancel();
        self.nodes.clear();
        self.helpers.clear();
        self.selection = None;
        self.camera = None;
        self.snapshot = None;
        self.disposed = true;
        tracing::debug!("Viewer disposed");
    }
}
