use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use shared::domain::{Coordinate, Day, MapPin, PinId, PinKey};

use super::*;
use crate::{
    config::MapCredentials,
    itinerary::focus::InputSource,
    map::{load_widget, MapWidgetLoader},
};

#[derive(Default)]
struct Log {
    added: usize,
    removed: usize,
    fits: usize,
    set_views: usize,
    destroyed: usize,
    live: Vec<MarkerSpec>,
}

struct FakeWidget {
    log: Arc<Mutex<Log>>,
    view: MapView,
    next_handle: u64,
    handles: Vec<(MarkerHandle, MarkerSpec)>,
    pending: Vec<MapEvent>,
}

impl FakeWidget {
    fn new(log: Arc<Mutex<Log>>) -> Self {
        Self {
            log,
            view: MapView::default(),
            next_handle: 0,
            handles: Vec::new(),
            pending: Vec::new(),
        }
    }
}

impl MapWidget for FakeWidget {
    fn view(&self) -> MapView {
        self.view
    }

    fn set_view(&mut self, view: MapView) {
        self.log.lock().expect("log").set_views += 1;
        self.view = view;
    }

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        let mut log = self.log.lock().expect("log");
        log.added += 1;
        log.live.push(spec.clone());
        self.handles.push((handle, spec));
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.handles.retain(|(h, _)| *h != handle);
        let mut log = self.log.lock().expect("log");
        log.removed += 1;
        log.live = self.handles.iter().map(|(_, s)| s.clone()).collect();
    }

    fn fit_to_markers(&mut self, handles: &[MarkerHandle]) -> MapView {
        self.log.lock().expect("log").fits += 1;
        let first = self
            .handles
            .iter()
            .find(|(h, _)| handles.contains(h))
            .map(|(_, s)| s.coordinate)
            .unwrap_or(self.view.center);
        self.view = MapView::new(first, 13.0);
        self.view
    }

    fn drain_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.pending)
    }

    fn destroy(&mut self) {
        self.log.lock().expect("log").destroyed += 1;
    }
}

fn pin(id: &str, lng: f64) -> MapPin {
    MapPin {
        id: Some(PinId::new(id)),
        name: format!("Stop {id}"),
        title: String::new(),
        coordinate: Some(Coordinate::new(lng, 35.0)),
        description: String::new(),
        strategy: String::new(),
        duration: String::new(),
        stop_label: String::new(),
        sequence: None,
    }
}

fn trip() -> Vec<Day> {
    let day = |pins| Day {
        header: String::new(),
        subtitle: String::new(),
        date_label: String::new(),
        pins,
        timeline: Vec::new(),
    };
    let mut unmapped = pin("x", 135.0);
    unmapped.coordinate = None;
    vec![
        day(vec![pin("a", 135.72), pin("b", 135.77), unmapped]),
        day(vec![pin("c", 135.67)]),
    ]
}

fn ready_adapter() -> (MapAdapter<FakeWidget>, Arc<Mutex<Log>>) {
    let log = Arc::new(Mutex::new(Log::default()));
    let mut adapter = MapAdapter::new();
    adapter.attach(Ok(FakeWidget::new(log.clone())));
    (adapter, log)
}

#[test]
fn first_marker_set_fits_once_and_day_switch_only_rebuilds() {
    let days = trip();
    let sequence = PinSequence::build(&days);
    let mut focus = FocusController::new(days.len());
    let (mut adapter, log) = ready_adapter();
    let mut desired = MapView::default();

    adapter.set_markers(&sequence, &focus, &mut desired);
    assert_eq!(adapter.marker_count(), 3);
    assert_eq!(log.lock().expect("log").fits, 1);
    assert_eq!(desired.zoom, 13.0);
    assert_eq!(desired.center, Coordinate::new(135.72, 35.0));

    // Unchanged inputs do not touch the widget.
    adapter.set_markers(&sequence, &focus, &mut desired);
    assert_eq!(log.lock().expect("log").added, 3);

    focus.set_active_day(1, InputSource::DayTab);
    desired = MapView::default();
    adapter.set_markers(&sequence, &focus, &mut desired);
    let log_now = log.lock().expect("log");
    assert_eq!(log_now.fits, 1);
    assert_eq!(log_now.added, 6);
    assert_eq!(log_now.removed, 3);
    assert_eq!(desired, MapView::default());
}

#[test]
fn rearming_fits_the_next_document() {
    let days = trip();
    let sequence = PinSequence::build(&days);
    let focus = FocusController::new(days.len());
    let (mut adapter, log) = ready_adapter();
    let mut desired = MapView::default();

    adapter.set_markers(&sequence, &focus, &mut desired);
    adapter.rearm_fit();
    adapter.set_markers(&sequence, &focus, &mut desired);
    assert_eq!(log.lock().expect("log").fits, 2);
}

#[test]
fn focused_marker_outranks_active_day_and_others() {
    let days = trip();
    let sequence = PinSequence::build(&days);
    let mut focus = FocusController::new(days.len());
    let b = sequence.get(&PinKey::new(0, "b")).expect("pin");
    focus.timeline_clicked(b);

    let specs = marker_specs(&sequence, &focus);
    let z: Vec<(String, i32, String)> = specs
        .iter()
        .map(|s| (s.key.to_string(), s.z_index(), s.label.clone()))
        .collect();
    assert_eq!(
        z,
        vec![
            ("0:a".to_string(), 120, "1".to_string()),
            ("0:b".to_string(), 200, "2".to_string()),
            ("1:c".to_string(), 50, "4".to_string()),
        ]
    );
    assert!(specs.iter().all(|s| s.offset == (-20.0, -20.0)));
    assert_eq!(specs[1].emphasis.size(), 48.0);
}

#[test]
fn view_changes_flow_into_desired_state_and_small_drift_is_not_pushed() {
    let (mut adapter, log) = ready_adapter();
    let panned = MapView::new(Coordinate::new(135.0, 34.0), 9.0);
    adapter
        .widget_mut()
        .expect("widget")
        .pending
        .extend([MapEvent::ViewChanged(panned), MapEvent::BackgroundClicked { click: 3 }]);

    let mut desired = MapView::default();
    let events = adapter.handle_events(&mut desired);
    assert_eq!(desired, panned);
    assert_eq!(events.len(), 2);

    adapter.set_view(MapView::default());
    assert_eq!(log.lock().expect("log").set_views, 0);
    adapter.set_view(panned);
    assert_eq!(log.lock().expect("log").set_views, 1);
    let live = adapter.widget().expect("widget").view();
    adapter.set_view(live.recenter(Coordinate::new(live.center.lng + 0.00001, live.center.lat)));
    assert_eq!(log.lock().expect("log").set_views, 1);
}

#[test]
fn every_failure_lands_in_the_same_degraded_state() {
    for reason in [
        MapUnavailable::MissingKey,
        MapUnavailable::LoadRejected("script blocked".into()),
        MapUnavailable::ConstructionFailed("bad image".into()),
    ] {
        let mut adapter: MapAdapter<FakeWidget> = MapAdapter::new();
        adapter.attach(Err(reason.clone()));
        assert!(matches!(adapter.state(), AdapterState::Unavailable(_)));

        let days = trip();
        let mut desired = MapView::default();
        adapter.set_markers(
            &PinSequence::build(&days),
            &FocusController::new(days.len()),
            &mut desired,
        );
        assert_eq!(adapter.marker_count(), 0);
        assert_eq!(desired, MapView::default());
    }
}

#[test]
fn dispose_runs_exactly_once() {
    let (mut adapter, log) = ready_adapter();
    adapter.dispose();
    adapter.dispose();
    drop(adapter);
    assert_eq!(log.lock().expect("log").destroyed, 1);

    let (adapter, log) = ready_adapter();
    drop(adapter);
    assert_eq!(log.lock().expect("log").destroyed, 1);
}

#[test]
fn late_widget_after_dispose_is_destroyed() {
    let log = Arc::new(Mutex::new(Log::default()));
    let mut adapter: MapAdapter<FakeWidget> = MapAdapter::new();
    adapter.dispose();
    adapter.attach(Ok(FakeWidget::new(log.clone())));
    assert_eq!(adapter.state(), &AdapterState::Disposed);
    assert_eq!(log.lock().expect("log").destroyed, 1);
}

struct CountingLoader {
    calls: AtomicUsize,
    log: Arc<Mutex<Log>>,
}

#[async_trait]
impl MapWidgetLoader for CountingLoader {
    type Widget = FakeWidget;

    async fn load(
        &self,
        _credentials: &MapCredentials,
        initial: MapView,
    ) -> Result<FakeWidget, MapUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut widget = FakeWidget::new(self.log.clone());
        widget.view = initial;
        Ok(widget)
    }
}

#[tokio::test]
async fn missing_key_never_reaches_the_loader() {
    let loader = CountingLoader {
        calls: AtomicUsize::new(0),
        log: Arc::new(Mutex::new(Log::default())),
    };

    let missing = load_widget(&loader, None, MapView::default()).await;
    assert!(matches!(missing, Err(MapUnavailable::MissingKey)));
    assert_eq!(loader.calls.load(Ordering::SeqCst), 0);

    let credentials = MapCredentials {
        key: "key".into(),
        security_code: None,
    };
    let widget = load_widget(&loader, Some(&credentials), MapView::default())
        .await
        .expect("widget");
    assert_eq!(widget.view(), MapView::default());
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
}
