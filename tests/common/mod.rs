//! In-memory provider fakes and a hand-driven spawner shared by the
//! integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use location_picker::{
    runtime::{AsyncHandle, AsyncSpawner, BoxedTask},
    Camera, Error, GeocodeResponse, Geocoder, LatLng, LocationPicker, MapHandle, MapOptions,
    MapProvider, PickerConfig, PlaceAutocomplete, PlaceResult, Prediction, Result,
};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

pub type GeocodeFn = dyn Fn(LatLng) -> Result<GeocodeResponse> + Send + Sync;

/// Spawner that parks every task until the test runs it
#[derive(Default)]
pub struct ManualSpawner {
    tasks: Mutex<Vec<(BoxedTask, Arc<AtomicBool>)>>,
    cancelled: Arc<AtomicUsize>,
}

impl ManualSpawner {
    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Runs the task at `index` in the queue to completion
    pub fn run(&self, index: usize) {
        let (task, finished) = self.tasks.lock().unwrap().remove(index);
        futures::executor::block_on(task);
        finished.store(true, Ordering::SeqCst);
    }

    /// Runs every queued task in spawn order
    pub fn run_all(&self) {
        while self.pending() > 0 {
            self.run(0);
        }
    }

    /// Ends the task at `index` without letting it reply, like a panic or abort
    pub fn abandon(&self, index: usize) {
        let (_, finished) = self.tasks.lock().unwrap().remove(index);
        finished.store(true, Ordering::SeqCst);
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct ParkedHandle {
    finished: Arc<AtomicBool>,
    cancelled: Arc<AtomicUsize>,
}

impl AsyncHandle for ParkedHandle {
    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
    }
}

impl AsyncSpawner for ManualSpawner {
    fn spawn_boxed(&self, future: BoxedTask) -> Box<dyn AsyncHandle> {
        let finished = Arc::new(AtomicBool::new(false));
        self.tasks.lock().unwrap().push((future, finished.clone()));
        Box::new(ParkedHandle {
            finished,
            cancelled: self.cancelled.clone(),
        })
    }
}

struct FakeGeocoder {
    respond: Arc<GeocodeFn>,
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn reverse_geocode(&self, location: LatLng) -> Result<GeocodeResponse> {
        (self.respond)(location)
    }
}

struct FakeAutocomplete;

#[async_trait]
impl PlaceAutocomplete for FakeAutocomplete {
    async fn predictions(&self, input: &str) -> Result<Vec<Prediction>> {
        Ok(vec![
            Prediction::new(format!("{input} NSW, Australia"), "sydney"),
            Prediction::new(format!("{input} Lagoon"), "nowhere"),
        ])
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceResult> {
        match place_id {
            "sydney" => Ok(PlaceResult::at(LatLng::new(-33.87, 151.21))
                .with_address("Sydney NSW, Australia")),
            "nowhere" => Ok(PlaceResult {
                name: Some("Lagoon".to_string()),
                ..PlaceResult::default()
            }),
            other => Err(Error::Provider {
                status: "NOT_FOUND".to_string(),
                message: other.to_string(),
            }),
        }
    }
}

pub struct FakeProvider {
    fail_load: bool,
    respond: Arc<GeocodeFn>,
    pub geocoders_created: AtomicUsize,
    pub autocompletes_created: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::answering(|_| {
            Ok(GeocodeResponse::ok(vec![
                PlaceResult::default().with_address("1 Example St, Canberra"),
                PlaceResult::default().with_address("Canberra ACT, Australia"),
            ]))
        })
    }

    pub fn answering(
        respond: impl Fn(LatLng) -> Result<GeocodeResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            fail_load: false,
            respond: Arc::new(respond),
            geocoders_created: AtomicUsize::new(0),
            autocompletes_created: AtomicUsize::new(0),
        }
    }

    pub fn failing_to_load() -> Self {
        Self {
            fail_load: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl MapProvider for FakeProvider {
    async fn load(&self) -> Result<()> {
        if self.fail_load {
            return Err(Error::Config("script blocked".to_string()));
        }
        Ok(())
    }

    fn render_map(&self, center: LatLng, zoom: f64, options: &MapOptions) -> Box<dyn MapHandle> {
        Box::new(Camera::new(center, zoom, options))
    }

    fn create_geocoder(&self) -> Arc<dyn Geocoder> {
        self.geocoders_created.fetch_add(1, Ordering::SeqCst);
        Arc::new(FakeGeocoder {
            respond: self.respond.clone(),
        })
    }

    fn autocomplete(&self) -> Arc<dyn PlaceAutocomplete> {
        self.autocompletes_created.fetch_add(1, Ordering::SeqCst);
        Arc::new(FakeAutocomplete)
    }
}

pub fn mount(
    provider: Arc<FakeProvider>,
    config: PickerConfig,
) -> (LocationPicker, Arc<ManualSpawner>) {
    let spawner = Arc::new(ManualSpawner::default());
    let picker = LocationPicker::mount(provider, spawner.clone(), config);
    (picker, spawner)
}

pub fn ready_picker(provider: Arc<FakeProvider>) -> (LocationPicker, Arc<ManualSpawner>) {
    let (mut picker, spawner) = mount(provider, PickerConfig::default());
    spawner.run_all();
    assert!(picker.poll());
    assert!(picker.is_ready());
    (picker, spawner)
}

pub fn settle(picker: &mut LocationPicker, spawner: &ManualSpawner) {
    spawner.run_all();
    picker.poll();
}
