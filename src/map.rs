use crate::errors::ActivityError;
use crate::models::{Activity, ActivityId, Details, Location};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_ZOOM: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MapHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub close_button: bool,
    pub close_on_escape_key: bool,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerContent {
    pub icon: &'static str,
    pub popup: String,
    pub options: PopupOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewOptions {
    pub animate: bool,
    pub pan_duration_secs: f64,
}

impl ViewOptions {
    pub fn animated() -> Self {
        Self {
            animate: true,
            pan_duration_secs: 1.0,
        }
    }

    pub fn instant() -> Self {
        Self {
            animate: false,
            pan_duration_secs: 0.0,
        }
    }
}

pub trait MapService {
    fn initialize(&mut self, center: Location, zoom: u8) -> MapHandle;
    fn add_marker(&mut self, map: MapHandle, location: Location, content: MarkerContent)
    -> MarkerHandle;
    fn remove_marker(&mut self, map: MapHandle, marker: MarkerHandle);
    fn set_view(&mut self, map: MapHandle, location: Location, zoom: u8, options: ViewOptions);
    fn for_each_marker(&self, map: MapHandle, visitor: &mut dyn FnMut(MarkerHandle, Location));
}

pub fn marker_content(activity: &Activity) -> MarkerContent {
    let kind = activity.kind();
    let metrics = match activity.details() {
        Details::Running {
            cadence_spm,
            pace_min_per_km,
        } => format!("{pace_min_per_km:.1} min/km, {cadence_spm} spm"),
        Details::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => format!("{speed_km_per_h:.1} km/h, {elevation_gain_m} m"),
    };
    MarkerContent {
        icon: kind.icon(),
        popup: format!("{} {} ({metrics})", kind.icon(), activity.description()),
        options: PopupOptions {
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
            close_button: true,
            close_on_escape_key: true,
            class_name: format!("{}-popup", kind.as_str()),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FormPhase {
    Idle,
    AwaitingSubmission { location: Location },
}

#[derive(Debug)]
pub struct MapSync {
    map: Option<MapHandle>,
    zoom: u8,
    phase: FormPhase,
    markers: HashMap<ActivityId, MarkerHandle>,
}

impl MapSync {
    pub fn new(zoom: u8) -> Self {
        Self {
            map: None,
            zoom,
            phase: FormPhase::Idle,
            markers: HashMap::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.map.is_some()
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn staged(&self) -> Option<Location> {
        match self.phase {
            FormPhase::AwaitingSubmission { location } => Some(location),
            FormPhase::Idle => None,
        }
    }

    pub fn marker_for(&self, id: &ActivityId) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Creates the map once. Returns false when a map already exists.
    pub fn initialize<M: MapService>(&mut self, service: &mut M, center: Location) -> bool {
        if self.map.is_some() {
            return false;
        }
        self.map = Some(service.initialize(center, self.zoom));
        true
    }

    /// Map click: stages `location`. A second click before submission re-stages.
    pub fn stage(&mut self, location: Location) -> Result<(), ActivityError> {
        if self.map.is_none() {
            return Err(ActivityError::MapUnavailable);
        }
        self.phase = FormPhase::AwaitingSubmission { location };
        Ok(())
    }

    pub fn reset(&mut self) -> Option<Location> {
        let staged = self.staged();
        self.phase = FormPhase::Idle;
        staged
    }

    /// Places a marker for `activity` unless the map is missing or one already exists.
    pub fn place_marker<M: MapService>(&mut self, service: &mut M, activity: &Activity) -> bool {
        let Some(map) = self.map else {
            return false;
        };
        if self.markers.contains_key(activity.id()) {
            return false;
        }
        let marker = service.add_marker(map, activity.location(), marker_content(activity));
        self.markers.insert(activity.id().clone(), marker);
        true
    }

    pub fn remove_marker_for<M: MapService>(&mut self, service: &mut M, id: &ActivityId) -> bool {
        let (Some(map), Some(marker)) = (self.map, self.markers.remove(id)) else {
            return false;
        };
        service.remove_marker(map, marker);
        true
    }

    /// Removes every marker on the map, including any the id table no longer knows about.
    pub fn remove_all<M: MapService>(&mut self, service: &mut M) {
        self.markers.clear();
        let Some(map) = self.map else {
            return;
        };
        let mut handles = Vec::new();
        service.for_each_marker(map, &mut |marker, _| handles.push(marker));
        for marker in handles {
            service.remove_marker(map, marker);
        }
    }

    pub fn center_on<M: MapService>(
        &self,
        service: &mut M,
        location: Location,
        options: ViewOptions,
    ) -> Result<(), ActivityError> {
        let map = self.map.ok_or(ActivityError::MapUnavailable)?;
        service.set_view(map, location, self.zoom, options);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Location,
    pub zoom: u8,
    pub animate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedMarker {
    pub location: Location,
    pub content: MarkerContent,
}

#[derive(Debug, Default)]
pub struct HeadlessMap {
    initializations: u32,
    next_marker: u64,
    view: Option<MapView>,
    markers: BTreeMap<MarkerHandle, PlacedMarker>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initializations(&self) -> u32 {
        self.initializations
    }

    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    pub fn markers(&self) -> impl Iterator<Item = &PlacedMarker> + '_ {
        self.markers.values()
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&PlacedMarker> {
        self.markers.get(&handle)
    }
}

impl MapService for HeadlessMap {
    fn initialize(&mut self, center: Location, zoom: u8) -> MapHandle {
        self.initializations += 1;
        self.view = Some(MapView {
            center,
            zoom,
            animate: false,
        });
        MapHandle(self.initializations)
    }

    fn add_marker(
        &mut self,
        _map: MapHandle,
        location: Location,
        content: MarkerContent,
    ) -> MarkerHandle {
        self.next_marker += 1;
        let handle = MarkerHandle(self.next_marker);
        self.markers.insert(handle, PlacedMarker { location, content });
        handle
    }

    fn remove_marker(&mut self, _map: MapHandle, marker: MarkerHandle) {
        self.markers.remove(&marker);
    }

    fn set_view(&mut self, _map: MapHandle, location: Location, zoom: u8, options: ViewOptions) {
        self.view = Some(MapView {
            center: location,
            zoom,
            animate: options.animate,
        });
    }

    fn for_each_marker(&self, _map: MapHandle, visitor: &mut dyn FnMut(MarkerHandle, Location)) {
        for (handle, marker) in &self.markers {
            visitor(*handle, marker.location);
        }
    }
}
