use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use campus_core::{Config, SystemClock};
use campus_services::{campus_events, EventId};
use campus_ui::{StatusChange, UiStateMachine, Widget, HOURS_REFRESH_PERIOD};
use campus_weather::{FixedLocation, LocationProvider, UnavailableLocation};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[tokio::main]
async fn main() -> Result<()> {
    campus_core::init()?;

    let config = match Config::load_validated() {
        Ok((config, _)) => config,
        Err(e) => {
            tracing::warn!("{} ({})", e.user_message(), e);
            Config::default()
        }
    };

    // CAMPUS_NO_LOCATION simulates a host without positioning support.
    let locator: Arc<dyn LocationProvider> = if std::env::var_os("CAMPUS_NO_LOCATION").is_some() {
        Arc::new(UnavailableLocation::default())
    } else {
        Arc::new(
            FixedLocation::new(campus_weather::Coordinates::campus_default())
                .with_delay(Duration::from_millis(300)),
        )
    };

    let (machine, mut changes) = UiStateMachine::new(
        &config,
        Arc::new(SystemClock),
        Box::new(StdRng::from_entropy()),
        locator,
    )?;

    tracing::info!("Campus Life started");

    machine.request_initial_location();
    machine.request_external_events();
    machine.request_availability();
    machine.watch_resource_hours(HOURS_REFRESH_PERIOD);

    let events = campus_events();
    let career = machine.search("career", &events);
    tracing::info!("Search \"career\": {} match(es)", career.matches.len());
    for hours in machine.all_resource_hours() {
        tracing::info!(
            "{}: {} ({})",
            hours.resource_kind.title(),
            hours.badge(),
            hours.schedule_label
        );
    }
    machine.submit_rsvp(EventId(1));

    let mut weather_requested = false;
    let idle = Duration::from_secs(3);
    while let Ok(Some(change)) = tokio::time::timeout(idle, changes.recv()).await {
        println!("{}", serde_json::to_string(&change)?);

        // Weather follows the location outcome, whichever way it went.
        if let StatusChange::Widget {
            widget: Widget::Weather,
            status,
            ..
        } = &change
        {
            if !weather_requested && !status.is_loading() {
                weather_requested = true;
                machine.request_weather();
            }
        }
    }

    machine.shutdown();
    tracing::info!("Campus Life stopped");
    Ok(())
}
