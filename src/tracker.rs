use crate::dom::Dom;
use crate::errors::ActivityError;
use crate::list::{ListSync, RowTarget};
use crate::map::{FormPhase, HeadlessMap, MapService, MapSync, MapView, ViewOptions};
use crate::models::{Activity, ActivityId, FormFields, Kind, Location};
use crate::persistence;
use crate::storage::BlobStore;
use crate::store::ActivityStore;
use serde::Serialize;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Geolocation {
    Pending,
    Located(Location),
    Failed(String),
}

pub struct Tracker<M, D, B> {
    store: ActivityStore,
    map_sync: MapSync,
    list: ListSync,
    geolocation: Geolocation,
    map: M,
    dom: D,
    blobs: B,
}

impl<M: MapService, D: Dom, B: BlobStore> Tracker<M, D, B> {
    pub fn new(map: M, dom: D, blobs: B, zoom: u8) -> Self {
        Self {
            store: ActivityStore::new(),
            map_sync: MapSync::new(zoom),
            list: ListSync::new(),
            geolocation: Geolocation::Pending,
            map,
            dom,
            blobs,
        }
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn map_sync(&self) -> &MapSync {
        &self.map_sync
    }

    pub fn list_sync(&self) -> &ListSync {
        &self.list
    }

    pub fn geolocation(&self) -> &Geolocation {
        &self.geolocation
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Hydrates the store from the blob store and renders the list straight away. Markers
    /// follow once the map exists. An unreadable session is dropped and the store starts empty.
    pub fn restore(&mut self) -> usize {
        let activities = match persistence::load_activities(&self.blobs) {
            Ok(activities) => activities,
            Err(err) => {
                warn!("starting with an empty session: {err}");
                Vec::new()
            }
        };
        if let Err(err) = self.store.replace_all(activities) {
            warn!("starting with an empty session: {err}");
        }

        self.render_all();
        info!(count = self.store.len(), "restored activities");
        self.store.len()
    }

    /// Single-shot geolocation completion. Returns true when it created the map.
    pub fn geolocated(&mut self, result: Result<Location, String>) -> bool {
        if self.geolocation != Geolocation::Pending {
            info!("ignoring stale geolocation result");
            return false;
        }
        match result {
            Ok(center) => {
                self.geolocation = Geolocation::Located(center);
                if !self.map_sync.initialize(&mut self.map, center) {
                    return false;
                }
                info!(lat = center.lat, lng = center.lng, "map initialized");
                self.render_all();
                true
            }
            Err(reason) => {
                error!("could not get position: {reason}");
                self.geolocation = Geolocation::Failed(reason);
                false
            }
        }
    }

    pub fn map_clicked(&mut self, location: Location) -> Result<(), ActivityError> {
        self.map_sync.stage(location)?;
        self.dom.show_form();
        Ok(())
    }

    pub fn type_changed(&mut self, kind: Kind) {
        self.dom.show_fields_for(kind);
    }

    /// Commits the staged location as a new activity. On error nothing changes and the form
    /// stays open.
    pub fn submit(&mut self, fields: FormFields) -> Result<Activity, ActivityError> {
        let location = self
            .map_sync
            .staged()
            .ok_or(ActivityError::NoPendingLocation)?;
        let activity = fields
            .into_activity(location)
            .inspect_err(|err| warn!("rejected submission: {err}"))?;
        self.store
            .add(activity.clone())
            .inspect_err(|err| error!("aborting submission: {err}"))?;

        self.map_sync.place_marker(&mut self.map, &activity);
        self.list.render(&mut self.dom, &activity);
        self.dom.hide_form();
        self.dom.clear_fields();
        self.map_sync.reset();
        self.persist()?;
        Ok(activity)
    }

    pub fn cancel(&mut self) -> bool {
        if self.map_sync.reset().is_none() {
            return false;
        }
        self.dom.hide_form();
        self.dom.clear_fields();
        true
    }

    pub fn row_clicked(
        &mut self,
        id: &ActivityId,
        target: RowTarget,
    ) -> Result<bool, ActivityError> {
        match target {
            RowTarget::Delete => self.delete(id),
            RowTarget::Body => self.focus(id),
        }
    }

    pub fn focus(&mut self, id: &ActivityId) -> Result<bool, ActivityError> {
        let Some(location) = self.store.get(id).map(Activity::location) else {
            return Ok(false);
        };
        self.map_sync
            .center_on(&mut self.map, location, ViewOptions::animated())?;
        Ok(true)
    }

    /// Drops the activity from the store, the map and the list, then persists. Pieces that
    /// are already gone are skipped. Returns whether the store held the id.
    pub fn delete(&mut self, id: &ActivityId) -> Result<bool, ActivityError> {
        let removed = self.store.remove_by_id(id).is_some();
        let marker = self.map_sync.remove_marker_for(&mut self.map, id);
        let row = self.list.remove(&mut self.dom, id);
        if !(removed && marker && row) {
            debug!(%id, removed, marker, row, "partial delete");
        }
        self.persist()?;
        Ok(removed)
    }

    pub fn clear_all(&mut self) -> Result<(), ActivityError> {
        self.store.clear();
        self.map_sync.remove_all(&mut self.map);
        self.list.clear(&mut self.dom);
        self.persist()
    }

    fn render_all(&mut self) {
        for activity in self.store.list() {
            self.list.render(&mut self.dom, activity);
            self.map_sync.place_marker(&mut self.map, activity);
        }
        if !self.map_sync.is_ready() {
            return;
        }
        if let Some(first) = self.store.first()
            && let Err(err) =
                self.map_sync
                    .center_on(&mut self.map, first.location(), ViewOptions::instant())
        {
            warn!("could not center on the first activity: {err}");
        }
    }

    fn persist(&mut self) -> Result<(), ActivityError> {
        persistence::save(&self.store, &mut self.blobs)
            .inspect_err(|err| error!("failed to persist activities: {err}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub id: ActivityId,
    pub location: Location,
    pub popup: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub ready: bool,
    pub view: Option<MapView>,
    pub form: FormPhase,
    pub markers: Vec<MarkerView>,
}

impl<D: Dom, B: BlobStore> Tracker<HeadlessMap, D, B> {
    pub fn map_snapshot(&self) -> MapSnapshot {
        let markers = self
            .store
            .list()
            .filter_map(|activity| {
                let handle = self.map_sync.marker_for(activity.id())?;
                let placed = self.map.marker(handle)?;
                Some(MarkerView {
                    id: activity.id().clone(),
                    location: placed.location,
                    popup: placed.content.popup.clone(),
                    class_name: placed.content.options.class_name.clone(),
                })
            })
            .collect();
        MapSnapshot {
            ready: self.map_sync.is_ready(),
            view: self.map.view().cloned(),
            form: self.map_sync.phase(),
            markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HeadlessDom;
    use crate::storage::MemoryBlobStore;

    type TestTracker = Tracker<HeadlessMap, HeadlessDom, MemoryBlobStore>;

    fn tracker() -> TestTracker {
        Tracker::new(HeadlessMap::new(), HeadlessDom::new(), MemoryBlobStore::new(), 13)
    }

    fn ride() -> FormFields {
        FormFields {
            kind: Kind::Cycling,
            distance: Some(20.0),
            duration: Some(60.0),
            cadence: None,
            elevation: Some(300.0),
        }
    }

    #[test]
    fn geolocation_is_single_shot() {
        let mut t = tracker();
        assert!(!t.geolocated(Err("denied".to_string())));
        assert!(!t.geolocated(Ok(Location::new(1.0, 1.0))));
        assert!(!t.map_sync().is_ready());
        assert_eq!(t.geolocation(), &Geolocation::Failed("denied".to_string()));

        let mut t = tracker();
        assert!(t.geolocated(Ok(Location::new(1.0, 1.0))));
        assert!(!t.geolocated(Ok(Location::new(2.0, 2.0))));
        assert_eq!(t.map().initializations(), 1);
    }

    #[test]
    fn map_click_opens_form_and_cancel_discards() {
        let mut t = tracker();
        assert_eq!(
            t.map_clicked(Location::new(1.0, 1.0)),
            Err(ActivityError::MapUnavailable)
        );
        t.geolocated(Ok(Location::new(0.0, 0.0)));
        t.map_clicked(Location::new(1.0, 1.0)).unwrap();
        assert!(t.dom().form().visible);

        assert!(t.cancel());
        assert!(!t.dom().form().visible);
        assert!(t.dom().form().cleared);
        assert_eq!(t.map_sync().phase(), FormPhase::Idle);
        assert!(!t.cancel());
        assert_eq!(t.submit(ride()), Err(ActivityError::NoPendingLocation));
        assert!(t.store().is_empty());
    }

    #[test]
    fn type_change_switches_field_row() {
        let mut t = tracker();
        t.type_changed(Kind::Cycling);
        assert_eq!(t.dom().form().kind, Kind::Cycling);
        assert!(t.store().is_empty());
    }

    #[test]
    fn row_body_click_centers_with_animation() {
        let mut t = tracker();
        t.geolocated(Ok(Location::new(0.0, 0.0)));
        t.map_clicked(Location::new(10.0, 20.0)).unwrap();
        let ride = t.submit(ride()).unwrap();

        assert!(t.row_clicked(ride.id(), RowTarget::Body).unwrap());
        let view = t.map().view().unwrap();
        assert_eq!(view.center, Location::new(10.0, 20.0));
        assert!(view.animate);
        assert!(!t.focus(&ActivityId::from("missing")).unwrap());
    }

    #[test]
    fn restore_without_map_renders_rows_only() {
        let mut blobs = MemoryBlobStore::new();
        let mut store = ActivityStore::new();
        store
            .add(crate::models::create_running(Location::new(3.0, 4.0), 5.0, 25.0, 180.0).unwrap())
            .unwrap();
        persistence::save(&store, &mut blobs).unwrap();

        let mut t = Tracker::new(HeadlessMap::new(), HeadlessDom::new(), blobs, 13);
        assert_eq!(t.restore(), 1);
        assert_eq!(t.dom().rows().len(), 1);
        assert_eq!(t.map().markers().count(), 0);
        assert!(t.map().view().is_none());
        assert_eq!(t.map().initializations(), 0);

        assert!(t.geolocated(Ok(Location::new(0.0, 0.0))));
        assert_eq!(t.map().markers().count(), 1);
        assert_eq!(t.map().view().unwrap().center, Location::new(3.0, 4.0));
        assert_eq!(t.dom().rows().len(), 1);
    }

    #[test]
    fn corrupt_session_starts_empty() {
        let mut blobs = MemoryBlobStore::new();
        blobs
            .set(persistence::STORAGE_KEY, r#"[{"id":"x","kind":"rowing"}]"#.to_string())
            .unwrap();
        let mut t = Tracker::new(HeadlessMap::new(), HeadlessDom::new(), blobs, 13);
        assert_eq!(t.restore(), 0);
        assert!(t.dom().rows().is_empty());
    }

    #[test]
    fn snapshot_lists_markers_by_id() {
        let mut t = tracker();
        t.geolocated(Ok(Location::new(0.0, 0.0)));
        t.map_clicked(Location::new(1.0, 2.0)).unwrap();
        let ride = t.submit(ride()).unwrap();

        let snapshot = t.map_snapshot();
        assert!(snapshot.ready);
        assert_eq!(snapshot.form, FormPhase::Idle);
        assert_eq!(snapshot.markers.len(), 1);
        assert_eq!(&snapshot.markers[0].id, ride.id());
        assert_eq!(snapshot.markers[0].class_name, "cycling-popup");
    }
}
