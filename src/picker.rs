//! The location picker coordinator.
//!
//! `LocationPicker` owns the selected coordinate and keeps the marker, the
//! camera and the address text in step with it. It lives on the UI thread:
//! asynchronous provider calls are spawned through an [`AsyncSpawner`] and
//! their replies are applied in [`LocationPicker::poll`].
//!
//! ```text
//!   mount ──load()──▶ Loading ──Ok──▶ Ready (until unmount)
//!                        │
//!                        └──Err──▶ stays Loading, placeholder only
//! ```

use crate::{
    core::{
        config::PickerConfig,
        geo::{LatLng, Point},
    },
    input::events::{EventHandled, MapEvent},
    layers::marker::Marker,
    provider::{
        GeocodeResponse, Geocoder, MapHandle, MapProvider, PlaceAutocomplete, PlaceResult,
        Prediction,
    },
    runtime::{AsyncHandle, AsyncSpawner},
    Result,
};
use crossbeam_channel::{Receiver, Sender};
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;

/// The committed selection. Replaced wholesale on every commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionState {
    pub position: LatLng,
    /// Number of commits before this one
    pub revision: u64,
}

impl SelectionState {
    fn initial(position: LatLng) -> Self {
        Self {
            position,
            revision: 0,
        }
    }

    fn replaced_by(&self, position: LatLng) -> Self {
        Self {
            position,
            revision: self.revision + 1,
        }
    }
}

/// What the host should draw this frame
#[derive(Debug, Clone, PartialEq)]
pub enum PickerView {
    /// Loading skeleton; no map, marker or input
    Placeholder,
    Interactive(InteractiveView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveView {
    pub camera_center: LatLng,
    pub zoom: f64,
    pub marker: Marker,
    pub address: String,
    pub suggestions: Vec<Prediction>,
}

/// Readiness gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Loading,
    Ready,
}

/// Replies from spawned provider calls
enum Reply {
    Loaded(Result<()>),
    Geocoded {
        ticket: u64,
        position: LatLng,
        outcome: Result<GeocodeResponse>,
    },
    Suggestions {
        query_id: u64,
        outcome: Result<Vec<Prediction>>,
    },
    PlaceDetails {
        revision: u64,
        outcome: Result<PlaceResult>,
    },
}

struct ReadyState {
    map: Box<dyn MapHandle>,
    marker: Marker,
    selection: SelectionState,
    address: String,
    suggestions: Vec<Prediction>,
    geocoder: Option<Arc<dyn Geocoder>>,
    autocomplete: Option<Arc<dyn PlaceAutocomplete>>,
    /// Owner of the address field; geocode replies with another ticket are stale
    address_ticket: u64,
    query_id: u64,
}

impl ReadyState {
    /// Moves selection, marker and camera together
    fn commit(&mut self, position: LatLng) {
        self.selection = self.selection.replaced_by(position);
        self.marker.set_position(position);
        self.map.pan_to(position);
    }

    fn claim_address(&mut self) -> u64 {
        self.address_ticket += 1;
        self.address_ticket
    }
}

enum State {
    Loading,
    Ready(Box<ReadyState>),
}

/// Map + search box location picker
pub struct LocationPicker {
    provider: Arc<dyn MapProvider>,
    spawner: Arc<dyn AsyncSpawner>,
    config: PickerConfig,
    state: State,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
    /// Spawned provider calls that may still reply
    tasks: Vec<Box<dyn AsyncHandle>>,
}

impl LocationPicker {
    /// Creates the picker and starts loading the provider SDK
    pub fn mount(
        provider: Arc<dyn MapProvider>,
        spawner: Arc<dyn AsyncSpawner>,
        config: PickerConfig,
    ) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut picker = Self {
            provider,
            spawner,
            config,
            state: State::Loading,
            tx,
            rx,
            tasks: Vec::new(),
        };

        let provider = picker.provider.clone();
        picker.spawn(async move { Reply::Loaded(provider.load().await) });

        picker
    }

    /// Tears the picker down, releasing the map, geocoder and autocomplete
    /// client and cancelling provider calls still in flight
    pub fn unmount(self) {
        log::debug!(
            "unmounting location picker ({:?}, {} tasks)",
            self.readiness(),
            self.tasks.len()
        );
        for task in &self.tasks {
            task.cancel();
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn readiness(&self) -> Readiness {
        match self.state {
            State::Loading => Readiness::Loading,
            State::Ready(_) => Readiness::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness() == Readiness::Ready
    }

    /// The committed selection, once ready
    pub fn selection(&self) -> Option<SelectionState> {
        match &self.state {
            State::Ready(ready) => Some(ready.selection),
            State::Loading => None,
        }
    }

    /// Current contents of the address field, once ready
    pub fn address(&self) -> Option<&str> {
        match &self.state {
            State::Ready(ready) => Some(&ready.address),
            State::Loading => None,
        }
    }

    pub fn view(&self) -> PickerView {
        match &self.state {
            State::Loading => PickerView::Placeholder,
            State::Ready(ready) => PickerView::Interactive(InteractiveView {
                camera_center: ready.map.center(),
                zoom: ready.map.zoom(),
                marker: ready.marker.clone(),
                address: ready.address.clone(),
                suggestions: ready.suggestions.clone(),
            }),
        }
    }

    /// True while a spawned provider call is still running or its reply has
    /// not been applied yet. Tasks that died without replying do not count.
    pub fn has_pending_work(&self) -> bool {
        !self.rx.is_empty() || self.tasks.iter().any(|task| !task.is_finished())
    }

    /// Applies every reply that has arrived. Returns true if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(reply) = self.rx.try_recv() {
            changed |= self.apply(reply);
        }
        self.tasks.retain(|task| !task.is_finished());
        changed
    }

    /// A place was picked from the search suggestions
    pub fn handle_place_selected(&mut self, place: &PlaceResult) -> EventHandled {
        let selection_zoom = self.config.selection_zoom;
        let State::Ready(ready) = &mut self.state else {
            return EventHandled::NotHandled;
        };

        match place.location() {
            Some(position) => {
                ready.commit(position);
                ready.map.set_zoom(selection_zoom);
                ready.claim_address();
                log::debug!("search selection committed at {}", position);
            }
            None => log::debug!("selected place has no geometry, ignoring"),
        }
        EventHandled::Handled
    }

    /// The user clicked the map at `position`
    pub fn handle_map_click(&mut self, position: LatLng) -> EventHandled {
        let State::Ready(ready) = &mut self.state else {
            return EventHandled::NotHandled;
        };

        ready.commit(position);

        let provider = &self.provider;
        let geocoder = ready
            .geocoder
            .get_or_insert_with(|| {
                log::debug!("creating geocoder");
                provider.create_geocoder()
            })
            .clone();
        let ticket = ready.claim_address();

        self.spawn(async move {
            Reply::Geocoded {
                ticket,
                position,
                outcome: geocoder.reverse_geocode(position).await,
            }
        });

        EventHandled::Handled
    }

    /// Routes pointer input from the map surface
    pub fn handle_map_event(&mut self, event: MapEvent) -> EventHandled {
        match event {
            MapEvent::Click { lat_lng, .. } => self.handle_map_click(lat_lng),
            MapEvent::Drag { delta } => self.pan_camera_by(delta),
            MapEvent::Scroll { delta, position } => {
                let Some(zoom) = self.camera_zoom() else {
                    return EventHandled::NotHandled;
                };
                self.zoom_camera(zoom + delta, Some(position))
            }
        }
    }

    /// Drags the camera without touching the selection
    pub fn pan_camera_by(&mut self, delta: Point) -> EventHandled {
        if !self.config.map_options.gestures {
            return EventHandled::NotHandled;
        }
        let State::Ready(ready) = &mut self.state else {
            return EventHandled::NotHandled;
        };
        ready.map.pan_by(delta);
        EventHandled::Handled
    }

    /// Zooms the camera without touching the selection
    pub fn zoom_camera(&mut self, zoom: f64, focus: Option<Point>) -> EventHandled {
        if !self.config.map_options.gestures {
            return EventHandled::NotHandled;
        }
        let State::Ready(ready) = &mut self.state else {
            return EventHandled::NotHandled;
        };
        match focus {
            Some(focus) => ready.map.zoom_around(zoom, focus),
            None => ready.map.set_zoom(zoom),
        }
        EventHandled::Handled
    }

    /// Tells the camera how big the map container is
    pub fn resize_map(&mut self, size: Point) {
        if let State::Ready(ready) = &mut self.state {
            ready.map.resize(size);
        }
    }

    /// The user typed into the address field
    pub fn set_query(&mut self, text: impl Into<String>) -> EventHandled {
        let min_query_len = self.config.min_query_len;
        let State::Ready(ready) = &mut self.state else {
            return EventHandled::NotHandled;
        };

        ready.address = text.into();
        ready.claim_address();
        ready.query_id += 1;

        let query = ready.address.trim().to_string();
        if query.chars().count() < min_query_len.max(1) {
            ready.suggestions.clear();
            return EventHandled::Handled;
        }

        let provider = &self.provider;
        let autocomplete = ready
            .autocomplete
            .get_or_insert_with(|| provider.autocomplete())
            .clone();
        let query_id = ready.query_id;

        self.spawn(async move {
            Reply::Suggestions {
                query_id,
                outcome: autocomplete.predictions(&query).await,
            }
        });

        EventHandled::Handled
    }

    /// The user picked suggestion `index` from the list
    pub fn select_suggestion(&mut self, index: usize) -> EventHandled {
        let State::Ready(ready) = &mut self.state else {
            return EventHandled::NotHandled;
        };
        if index >= ready.suggestions.len() {
            return EventHandled::NotHandled;
        }

        let prediction = ready.suggestions.swap_remove(index);
        ready.suggestions.clear();
        ready.address = prediction.description;
        ready.claim_address();
        // Late suggestion replies must not reopen the list
        ready.query_id += 1;

        let provider = &self.provider;
        let autocomplete = ready
            .autocomplete
            .get_or_insert_with(|| provider.autocomplete())
            .clone();
        let revision = ready.selection.revision;
        let place_id = prediction.place_id;

        self.spawn(async move {
            Reply::PlaceDetails {
                revision,
                outcome: autocomplete.place_details(&place_id).await,
            }
        });

        EventHandled::Handled
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Reply> + Send + 'static,
    {
        let tx = self.tx.clone();
        let handle = self.spawner.spawn_boxed(
            async move {
                let _ = tx.send(task.await);
            }
            .boxed(),
        );
        self.tasks.push(handle);
    }

    fn camera_zoom(&self) -> Option<f64> {
        match &self.state {
            State::Ready(ready) => Some(ready.map.zoom()),
            State::Loading => None,
        }
    }

    fn apply(&mut self, reply: Reply) -> bool {
        match reply {
            Reply::Loaded(outcome) => self.finish_loading(outcome),
            Reply::Geocoded {
                ticket,
                position,
                outcome,
            } => {
                let State::Ready(ready) = &mut self.state else {
                    return false;
                };
                if ticket != ready.address_ticket {
                    log::debug!("dropping stale geocode reply for {}", position);
                    return false;
                }
                ready.address = address_or_coordinates(position, outcome);
                true
            }
            Reply::Suggestions { query_id, outcome } => {
                let State::Ready(ready) = &mut self.state else {
                    return false;
                };
                if query_id != ready.query_id {
                    return false;
                }
                match outcome {
                    Ok(predictions) => ready.suggestions = predictions,
                    Err(e) => {
                        log::warn!("autocomplete failed: {}", e);
                        ready.suggestions.clear();
                    }
                }
                true
            }
            Reply::PlaceDetails { revision, outcome } => {
                let current = match &self.state {
                    State::Ready(ready) => ready.selection.revision,
                    State::Loading => return false,
                };
                if revision != current {
                    log::debug!("selection moved on, dropping place details");
                    return false;
                }
                match outcome {
                    Ok(place) => self.handle_place_selected(&place).is_handled(),
                    Err(e) => {
                        log::warn!("place details failed: {}", e);
                        false
                    }
                }
            }
        }
    }

    fn finish_loading(&mut self, outcome: Result<()>) -> bool {
        if let State::Ready(_) = self.state {
            return false;
        }
        if let Err(e) = outcome {
            log::error!("map provider failed to load, staying on placeholder: {}", e);
            return false;
        }

        let center = self.config.default_center;
        let map = self.provider.render_map(
            center,
            self.config.initial_zoom,
            &self.config.map_options,
        );
        self.state = State::Ready(Box::new(ReadyState {
            map,
            marker: Marker::new(center),
            selection: SelectionState::initial(center),
            address: String::new(),
            suggestions: Vec::new(),
            geocoder: None,
            autocomplete: None,
            address_ticket: 0,
            query_id: 0,
        }));
        log::debug!("map provider ready, picker interactive at {}", center);
        true
    }
}

/// Address text for a reverse geocode outcome. Never empty.
pub fn address_or_coordinates(position: LatLng, outcome: Result<GeocodeResponse>) -> String {
    match outcome {
        Ok(response) => match response.best_address() {
            Some(address) => address.to_string(),
            None => {
                log::warn!(
                    "reverse geocode for {} returned {} with {} results",
                    position,
                    response.status,
                    response.results.len()
                );
                position.to_coordinate_text()
            }
        },
        Err(e) => {
            log::warn!("reverse geocode for {} failed: {}", position, e);
            position.to_coordinate_text()
        }
    }
}
