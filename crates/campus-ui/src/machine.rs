//! UI state machine façade.
//!
//! One entry point per user action. Each moves its widget to Loading right
//! away, runs the simulated request as a cancellable deferred task on the
//! runtime, and reports the outcome through the status channel. The newest
//! request on a widget always wins.

use std::sync::Arc;
use std::time::Duration;

use campus_core::{Clock, Config, LatencyConfig, LocationConfig, LocationError};
use campus_services::{
    community_events, compute_hours, compute_live_metrics, EventId, ResourceHours, ResourceKind,
    RsvpBook, RsvpStatus, SearchResult, Searchable,
};
use campus_weather::{
    synthesize, Coordinates, FixSource, LocationCache, LocationFix, LocationProvider,
    PositionOptions,
};
use parking_lot::{Mutex, RwLock};
use rand::RngCore;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

use crate::controller::{Notifier, Ticket, WidgetController};
use crate::deferred::spawn_deferred;
use crate::error_mapping::location_error;
use crate::widget::{Payload, RequestId, StatusChange, Widget, WidgetError, WidgetStatus};

/// Errors constructing the state machine
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// How often the resource hours are re-checked
pub const HOURS_REFRESH_PERIOD: Duration = Duration::from_secs(60);

const SHUT_DOWN_MESSAGE: &str = "Campus Life is shutting down.";

/// Random source shared by the synthesizers
pub type SharedRng = Arc<Mutex<Box<dyn RngCore + Send>>>;

#[derive(Debug, Default)]
struct LocationState {
    current: Option<LocationFix>,
    cache: LocationCache,
}

pub struct UiStateMachine {
    runtime: Handle,
    root: CancellationToken,
    clock: Arc<dyn Clock>,
    rng: SharedRng,
    locator: Arc<dyn LocationProvider>,
    default_coordinates: Coordinates,
    location_config: LocationConfig,
    latency: RwLock<LatencyConfig>,
    notifier: Notifier,

    weather: WidgetController,
    external_events: WidgetController,
    availability: WidgetController,

    location: Arc<Mutex<LocationState>>,
    rsvp: Arc<Mutex<RsvpBook>>,
    hours_watch: Mutex<Option<CancellationToken>>,
}

impl UiStateMachine {
    /// Build a state machine bound to the current tokio runtime.
    ///
    /// Returns the machine and the receiver the view listens on.
    ///
    /// # Errors
    /// `UiError::NoRuntime` when called outside a tokio runtime.
    pub fn new(
        config: &Config,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RngCore + Send>,
        locator: Arc<dyn LocationProvider>,
    ) -> Result<(Self, UnboundedReceiver<StatusChange>), UiError> {
        let runtime = Handle::try_current()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Notifier::new(tx);

        let default_coordinates = Coordinates::new(
            config.location.default_latitude,
            config.location.default_longitude,
        )
        .unwrap_or_else(|e| {
            tracing::warn!("{}; using built-in campus coordinates", e);
            Coordinates::campus_default()
        });

        let machine = Self {
            runtime,
            root: CancellationToken::new(),
            clock,
            rng: Arc::new(Mutex::new(rng)),
            locator,
            default_coordinates,
            location_config: config.location.clone(),
            latency: RwLock::new(config.latency.clone()),
            weather: WidgetController::new(Widget::Weather, notifier.clone()),
            external_events: WidgetController::new(Widget::ExternalEvents, notifier.clone()),
            availability: WidgetController::new(Widget::Availability, notifier.clone()),
            notifier,
            location: Arc::new(Mutex::new(LocationState::default())),
            rsvp: Arc::new(Mutex::new(RsvpBook::new())),
            hours_watch: Mutex::new(None),
        };

        tracing::info!(
            "UI state machine ready (default location {})",
            machine.default_coordinates.display(4)
        );
        Ok((machine, rx))
    }

    /// Move `controller` to Loading for a new request. After shutdown the
    /// request fails straight away and only its id comes back.
    fn start(&self, controller: &WidgetController) -> Result<Ticket, RequestId> {
        let ticket = controller.begin(&self.root);
        if self.root.is_cancelled() {
            controller.complete(ticket.id, Err(WidgetError::new(SHUT_DOWN_MESSAGE)));
            return Err(ticket.id);
        }
        Ok(ticket)
    }

    fn controller(&self, widget: Widget) -> &WidgetController {
        match widget {
            Widget::Weather => &self.weather,
            Widget::ExternalEvents => &self.external_events,
            Widget::Availability => &self.availability,
        }
    }

    pub fn status(&self, widget: Widget) -> WidgetStatus {
        self.controller(widget).status()
    }

    /// Id of the newest request issued on `widget`, if any.
    pub fn latest_request(&self, widget: Widget) -> Option<RequestId> {
        self.controller(widget).latest_request()
    }

    /// Replace the simulated latencies used by subsequent requests.
    pub fn set_latency(&self, latency: LatencyConfig) {
        *self.latency.write() = latency;
    }

    /// Coordinates the next weather request will use.
    pub fn coordinates(&self) -> Coordinates {
        self.location
            .lock()
            .current
            .map(|fix| fix.coordinates)
            .unwrap_or(self.default_coordinates)
    }

    pub fn location_fix(&self) -> Option<LocationFix> {
        self.location.lock().current
    }

    /// Fetch weather for the current coordinates.
    pub fn request_weather(&self) -> RequestId {
        let coordinates = self.coordinates();
        self.spawn_weather(coordinates)
    }

    /// Fetch weather for explicit coordinates.
    ///
    /// Out-of-range input is reported on the weather widget, not returned.
    pub fn request_weather_at(&self, latitude: f64, longitude: f64) -> RequestId {
        match Coordinates::new(latitude, longitude) {
            Ok(coordinates) => self.spawn_weather(coordinates),
            Err(e) => match self.start(&self.weather) {
                Ok(ticket) => {
                    self.weather.complete(ticket.id, Err(e.into()));
                    ticket.id
                }
                Err(id) => id,
            },
        }
    }

    fn spawn_weather(&self, coordinates: Coordinates) -> RequestId {
        let ticket = match self.start(&self.weather) {
            Ok(ticket) => ticket,
            Err(id) => return id,
        };
        let id = ticket.id;
        let controller = self.weather.clone();
        let clock = self.clock.clone();
        let rng = self.rng.clone();

        spawn_deferred(
            &self.runtime,
            ticket.token,
            self.latency.read().weather(),
            move || async move {
                let report = {
                    let mut rng = rng.lock();
                    synthesize(&coordinates, clock.now(), &mut *rng)
                };
                controller.complete(id, Ok(Payload::Weather(report)));
            },
        );
        id
    }

    /// Location request issued when the page first loads.
    pub fn request_initial_location(&self) -> RequestId {
        self.request_location(PositionOptions::from_config_initial(&self.location_config))
    }

    /// Location request behind the "use my location" button.
    pub fn request_location_on_demand(&self) -> RequestId {
        self.request_location(PositionOptions::from_config_on_demand(&self.location_config))
    }

    /// Ask the location provider for the device position.
    ///
    /// Reported on the weather widget. A fix younger than
    /// `options.max_cache_age` is reused without asking the provider. On
    /// failure the error carries a fallback action; an earlier device fix
    /// stays current, otherwise the default campus coordinates take over.
    pub fn request_location(&self, options: PositionOptions) -> RequestId {
        let ticket = match self.start(&self.weather) {
            Ok(ticket) => ticket,
            Err(id) => return id,
        };
        let id = ticket.id;
        let cached = self
            .location
            .lock()
            .cache
            .fresh(self.clock.now(), options.max_cache_age);

        let controller = self.weather.clone();
        let clock = self.clock.clone();
        let locator = self.locator.clone();
        let location = self.location.clone();
        let fallback = self.default_coordinates;

        spawn_deferred(&self.runtime, ticket.token, Duration::ZERO, move || async move {
            let outcome = match cached {
                Some(fix) => Ok(fix),
                None => {
                    match tokio::time::timeout(options.timeout, locator.current_position(&options))
                        .await
                    {
                        Ok(Ok(coordinates)) => Ok(LocationFix {
                            coordinates,
                            captured_at: clock.now(),
                            source: FixSource::Device,
                        }),
                        Ok(Err(e)) => Err(e),
                        Err(_) => Err(LocationError::Timeout),
                    }
                }
            };

            controller.complete_with(id, || {
                let mut state = location.lock();
                match outcome {
                    Ok(fix) => {
                        tracing::info!(
                            "Location {} ({:?})",
                            fix.coordinates.display(4),
                            fix.source
                        );
                        state.cache.store(fix);
                        state.current = Some(fix);
                        Ok(Payload::Location(fix))
                    }
                    Err(e) => {
                        let has_fix = state
                            .current
                            .is_some_and(|fix| fix.source != FixSource::Default);
                        if !has_fix {
                            state.current = Some(LocationFix {
                                coordinates: fallback,
                                captured_at: clock.now(),
                                source: FixSource::Default,
                            });
                        }
                        Err(location_error(e, fallback))
                    }
                }
            });
        });
        id
    }

    /// Load partner events for the community panel.
    pub fn request_external_events(&self) -> RequestId {
        let ticket = match self.start(&self.external_events) {
            Ok(ticket) => ticket,
            Err(id) => return id,
        };
        let id = ticket.id;
        let controller = self.external_events.clone();
        let clock = self.clock.clone();

        spawn_deferred(
            &self.runtime,
            ticket.token,
            self.latency.read().external_events(),
            move || async move {
                let events = community_events(clock.now());
                controller.complete(id, Ok(Payload::ExternalEvents(events)));
            },
        );
        id
    }

    /// Load the live resource status panel.
    pub fn request_availability(&self) -> RequestId {
        let ticket = match self.start(&self.availability) {
            Ok(ticket) => ticket,
            Err(id) => return id,
        };
        let id = ticket.id;
        let controller = self.availability.clone();
        let clock = self.clock.clone();
        let rng = self.rng.clone();

        spawn_deferred(
            &self.runtime,
            ticket.token,
            self.latency.read().availability(),
            move || async move {
                let snapshot = {
                    let mut rng = rng.lock();
                    compute_live_metrics(clock.now(), &mut *rng)
                };
                controller.complete(id, Ok(Payload::Availability(snapshot)));
            },
        );
        id
    }

    /// Opening status for a resource key from the view; unknown keys use the
    /// default schedule.
    pub fn resource_hours(&self, key: &str) -> ResourceHours {
        compute_hours(ResourceKind::from_key(key), self.clock.now())
    }

    pub fn all_resource_hours(&self) -> Vec<ResourceHours> {
        hours_snapshot(self.clock.as_ref())
    }

    /// Emit `StatusChange::Hours` now and then every `period` until
    /// shutdown. Calling again replaces the previous schedule.
    pub fn watch_resource_hours(&self, period: Duration) {
        if period.is_zero() {
            tracing::warn!("Ignoring zero hours refresh period");
            return;
        }

        let token = self.root.child_token();
        if let Some(previous) = self.hours_watch.lock().replace(token.clone()) {
            previous.cancel();
        }

        let clock = self.clock.clone();
        let notifier = self.notifier.clone();
        self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::trace!("Hours refresh stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        notifier.emit(StatusChange::Hours {
                            hours: hours_snapshot(clock.as_ref()),
                        });
                    }
                }
            }
        });
    }

    /// RSVP for an event. Idempotent: a pending or confirmed event is left
    /// as is and its current state returned.
    pub fn submit_rsvp(&self, event: EventId) -> RsvpStatus {
        {
            let mut book = self.rsvp.lock();
            if self.root.is_cancelled() {
                tracing::debug!("RSVP for {} ignored after shutdown", event);
                return book.status(event);
            }
            if book.begin(event).is_none() {
                let status = book.status(event);
                tracing::debug!("RSVP for {} already {:?}", event, status);
                return status;
            }
            self.notifier.emit(StatusChange::Rsvp {
                event,
                status: RsvpStatus::Pending,
            });
        }

        let rsvp = self.rsvp.clone();
        let notifier = self.notifier.clone();
        spawn_deferred(
            &self.runtime,
            self.root.child_token(),
            self.latency.read().rsvp(),
            move || async move {
                let mut book = rsvp.lock();
                if book.confirm(event) {
                    tracing::info!("RSVP confirmed for {}", event);
                    notifier.emit(StatusChange::Rsvp {
                        event,
                        status: RsvpStatus::Confirmed,
                    });
                }
            },
        );
        RsvpStatus::Pending
    }

    pub fn rsvp_status(&self, event: EventId) -> RsvpStatus {
        self.rsvp.lock().status(event)
    }

    /// Filter `records` by `term`. Synchronous; touches no widget state.
    pub fn search<T: Searchable + Clone>(&self, term: &str, records: &[T]) -> SearchResult<T> {
        campus_services::search(term, records)
    }

    /// Cancel everything in flight.
    ///
    /// Loading widgets move to Error and pending RSVPs return to Idle so the
    /// view never waits on work that will not finish. Later requests fail
    /// immediately.
    pub fn shutdown(&self) {
        tracing::info!("UI state machine shutdown");
        self.root.cancel();

        for widget in Widget::ALL {
            self.controller(widget)
                .fail_in_flight(WidgetError::new(SHUT_DOWN_MESSAGE));
        }

        let mut book = self.rsvp.lock();
        for event in book.abandon_pending() {
            self.notifier.emit(StatusChange::Rsvp {
                event,
                status: RsvpStatus::Idle,
            });
        }
    }
}

impl Drop for UiStateMachine {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

fn hours_snapshot(clock: &dyn Clock) -> Vec<ResourceHours> {
    let now = clock.now();
    ResourceKind::all()
        .iter()
        .map(|kind| compute_hours(*kind, now))
        .collect()
}
