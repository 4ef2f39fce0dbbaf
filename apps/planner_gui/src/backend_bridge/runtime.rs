//! Backend worker: owns the tokio runtime, the planner API client, the
//! debouncers and the itinerary store. The UI only reaches it through the
//! command queue.

use std::thread;

use client_core::{
    itinerary::ItineraryStore,
    map::{
        load_widget,
        static_map::{StaticMapClient, StaticMapRequest},
    },
    ClientSettings, Debouncer, Locator, MapCredentials, PlannerApi,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::map_canvas::{decode_backdrop, StaticMapLoader};

pub struct BackendConfig {
    pub settings: ClientSettings,
    pub store: ItineraryStore,
}

pub fn spawn_backend_thread(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    config: BackendConfig,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(run_worker(cmd_rx, ui_tx, config));
    });
}

struct Worker {
    api: PlannerApi,
    static_map: StaticMapClient,
    locator: Option<Locator>,
    credentials: Option<MapCredentials>,
    store: ItineraryStore,
    default_city: String,
    suggestions: Debouncer,
    recommendations: Debouncer,
    ui_tx: Sender<UiEvent>,
}

async fn run_worker(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, config: BackendConfig) {
    let BackendConfig { settings, store } = config;
    let api = match PlannerApi::new(&settings.api_base_url) {
        Ok(api) => api,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: {err}"),
            )));
            error!(%err, "planner api client unavailable");
            return;
        }
    };

    let runtime = Handle::current();
    let mut worker = Worker {
        api,
        static_map: StaticMapClient::new(reqwest::Client::new(), settings.static_map_base_url.clone()),
        locator: settings
            .geolocation_url()
            .map(|url| Locator::new(reqwest::Client::new(), url)),
        credentials: settings.map_credentials(),
        store,
        default_city: settings.default_city.clone(),
        suggestions: Debouncer::new(settings.suggestion_debounce(), runtime.clone()),
        recommendations: Debouncer::new(settings.recommendation_debounce(), runtime),
        ui_tx,
    };
    info!(api = worker.api.base_url(), "backend worker ready");
    let _ = worker
        .ui_tx
        .try_send(UiEvent::Info("Backend worker ready".to_string()));

    while let Ok(cmd) = cmd_rx.recv() {
        worker.handle(cmd);
    }
    info!("ui command queue closed; backend worker exiting");
}

impl Worker {
    fn handle(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::SearchSuggestions { query } => self.search_suggestions(query),
            BackendCommand::CancelSuggestions => self.suggestions.cancel(),
            BackendCommand::RecommendLocations { city, tags } => self.recommend_locations(city, tags),
            BackendCommand::LoadItinerary => {
                let loaded = self.store.load_or_sample();
                let _ = self.ui_tx.try_send(UiEvent::ItineraryLoaded(loaded));
            }
            BackendCommand::LoadMap {
                initial,
                width,
                height,
            } => {
                let loader = StaticMapLoader::new(self.static_map.clone(), width, height);
                let credentials = self.credentials.clone();
                let ui_tx = self.ui_tx.clone();
                tokio::spawn(async move {
                    let loaded = load_widget(&loader, credentials.as_ref(), initial).await;
                    let _ = ui_tx.try_send(UiEvent::MapLoaded(loaded));
                });
            }
            BackendCommand::FetchBackdrop { request } => self.fetch_backdrop(request),
            BackendCommand::Locate => self.locate(),
        }
    }

    fn search_suggestions(&mut self, query: String) {
        let query = query.trim().to_string();
        if query.chars().count() < client_core::api::MIN_SUGGESTION_QUERY_CHARS {
            self.suggestions.cancel();
            let _ = self.ui_tx.try_send(UiEvent::Suggestions {
                query,
                items: Vec::new(),
            });
            return;
        }
        let api = self.api.clone();
        let ui_tx = self.ui_tx.clone();
        self.suggestions.schedule(async move {
            let items = api.search_suggestions(&query).await;
            let _ = ui_tx.try_send(UiEvent::Suggestions { query, items });
        });
    }

    fn recommend_locations(&mut self, city: String, tags: Option<String>) {
        let city = match city.trim() {
            "" => self.default_city.clone(),
            city => city.to_string(),
        };
        let api = self.api.clone();
        let ui_tx = self.ui_tx.clone();
        self.recommendations.schedule(async move {
            let items = api.recommend_locations(&city, tags.as_deref()).await;
            let _ = ui_tx.try_send(UiEvent::Recommendations { city, tags, items });
        });
    }

    fn locate(&self) {
        let Some(locator) = self.locator.clone() else {
            debug!("locating is switched off");
            return;
        };
        let ui_tx = self.ui_tx.clone();
        tokio::spawn(async move {
            if let Some(position) = locator.locate().await {
                let _ = ui_tx.try_send(UiEvent::Located(position));
            }
        });
    }

    fn fetch_backdrop(&self, request: StaticMapRequest) {
        let Some(credentials) = self.credentials.clone() else {
            let _ = self
                .ui_tx
                .try_send(UiEvent::BackdropFailed(request, "no map key configured".to_string()));
            return;
        };
        let client = self.static_map.clone();
        let ui_tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let decoded = match client.fetch(&credentials, request).await {
                Ok(backdrop) => decode_backdrop(backdrop).map_err(|err| err.to_string()),
                Err(err) => Err(err.to_string()),
            };
            let event = match decoded {
                Ok(decoded) => UiEvent::BackdropLoaded(decoded),
                Err(reason) => {
                    warn!(%reason, "backdrop refresh failed");
                    UiEvent::BackdropFailed(request, reason)
                }
            };
            let _ = ui_tx.try_send(event);
        });
    }
}
