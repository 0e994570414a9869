//! Per-widget status owner.
//!
//! Each widget has its own controller and its own lock. A request takes a
//! ticket; only the holder of the newest ticket may complete it.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::widget::{Payload, RequestId, StatusChange, Widget, WidgetError, WidgetStatus};

/// Sends status changes to the view. A dropped receiver is not an error.
#[derive(Debug, Clone)]
pub(crate) struct Notifier {
    tx: UnboundedSender<StatusChange>,
}

impl Notifier {
    pub(crate) fn new(tx: UnboundedSender<StatusChange>) -> Self {
        Self { tx }
    }

    pub(crate) fn emit(&self, change: StatusChange) {
        if self.tx.send(change).is_err() {
            tracing::trace!("Status receiver dropped");
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    status: WidgetStatus,
    latest: u64,
    in_flight: Option<CancellationToken>,
}

/// Handle to the request that currently owns a widget
#[derive(Debug)]
pub(crate) struct Ticket {
    pub(crate) id: RequestId,
    pub(crate) token: CancellationToken,
}

#[derive(Debug, Clone)]
pub(crate) struct WidgetController {
    widget: Widget,
    slot: Arc<Mutex<Slot>>,
    notifier: Notifier,
}

impl WidgetController {
    pub(crate) fn new(widget: Widget, notifier: Notifier) -> Self {
        Self {
            widget,
            slot: Arc::new(Mutex::new(Slot::default())),
            notifier,
        }
    }

    /// Move to Loading for a new request, cancelling any request in flight.
    pub(crate) fn begin(&self, parent: &CancellationToken) -> Ticket {
        let mut slot = self.slot.lock();
        if let Some(previous) = slot.in_flight.take() {
            tracing::debug!(
                "{}: request {} superseded",
                self.widget,
                slot.latest
            );
            previous.cancel();
        }

        slot.latest += 1;
        let id = RequestId(slot.latest);
        let token = parent.child_token();
        slot.in_flight = Some(token.clone());
        slot.status = WidgetStatus::Loading;

        self.notifier.emit(StatusChange::Widget {
            widget: self.widget,
            request: id,
            status: WidgetStatus::Loading,
        });

        Ticket { id, token }
    }

    /// Complete request `id` if it is still the newest one.
    ///
    /// `outcome` runs under the widget lock and only for the newest request,
    /// so side effects it performs can never come from a stale request.
    pub(crate) fn complete_with<F>(&self, id: RequestId, outcome: F) -> bool
    where
        F: FnOnce() -> Result<Payload, WidgetError>,
    {
        let mut slot = self.slot.lock();
        if slot.latest != id.0 || !slot.status.can_complete() {
            tracing::debug!(
                "{}: discarding stale completion of request {} (latest {})",
                self.widget,
                id.0,
                slot.latest
            );
            return false;
        }

        slot.in_flight = None;
        slot.status = match outcome() {
            Ok(payload) => WidgetStatus::Success(payload),
            Err(error) => {
                tracing::warn!("{}: request {} failed: {}", self.widget, id.0, error.message);
                WidgetStatus::Error(error)
            }
        };

        self.notifier.emit(StatusChange::Widget {
            widget: self.widget,
            request: id,
            status: slot.status.clone(),
        });
        true
    }

    pub(crate) fn complete(&self, id: RequestId, outcome: Result<Payload, WidgetError>) -> bool {
        self.complete_with(id, || outcome)
    }

    /// Fail the request in flight, if any. Used when the machine shuts down.
    pub(crate) fn fail_in_flight(&self, error: WidgetError) -> bool {
        let mut slot = self.slot.lock();
        if !slot.status.can_complete() {
            return false;
        }
        if let Some(token) = slot.in_flight.take() {
            token.cancel();
        }

        let id = RequestId(slot.latest);
        tracing::debug!("{}: request {} abandoned: {}", self.widget, id.0, error.message);
        slot.status = WidgetStatus::Error(error);
        self.notifier.emit(StatusChange::Widget {
            widget: self.widget,
            request: id,
            status: slot.status.clone(),
        });
        true
    }

    pub(crate) fn status(&self) -> WidgetStatus {
        self.slot.lock().status.clone()
    }

    pub(crate) fn latest_request(&self) -> Option<RequestId> {
        match self.slot.lock().latest {
            0 => None,
            n => Some(RequestId(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_services::compute_live_metrics;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::sync::mpsc;

    fn controller() -> (WidgetController, mpsc::UnboundedReceiver<StatusChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            WidgetController::new(Widget::Availability, Notifier::new(tx)),
            rx,
        )
    }

    fn payload() -> Payload {
        let now = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Payload::Availability(compute_live_metrics(now, &mut StdRng::seed_from_u64(1)))
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<StatusChange>) -> Vec<StatusChange> {
        let mut out = Vec::new();
        while let Ok(change) = rx.try_recv() {
            out.push(change);
        }
        out
    }

    #[test]
    fn begin_then_complete_emits_two_changes() {
        let (ctl, mut rx) = controller();
        let root = CancellationToken::new();
        assert_eq!(ctl.status(), WidgetStatus::Idle);
        assert_eq!(ctl.latest_request(), None);

        let ticket = ctl.begin(&root);
        assert_eq!(ctl.status(), WidgetStatus::Loading);
        assert!(ctl.complete(ticket.id, Ok(payload())));

        let changes = drain(&mut rx);
        assert_eq!(changes.len(), 2);
        assert!(matches!(
            &changes[0],
            StatusChange::Widget { status: WidgetStatus::Loading, .. }
        ));
        assert!(matches!(
            &changes[1],
            StatusChange::Widget { status: WidgetStatus::Success(_), .. }
        ));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let (ctl, mut rx) = controller();
        let root = CancellationToken::new();
        let first = ctl.begin(&root);
        let second = ctl.begin(&root);

        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());

        assert!(ctl.complete(second.id, Ok(payload())));
        assert!(!ctl.complete(first.id, Err(WidgetError::new("late"))));
        assert!(matches!(ctl.status(), WidgetStatus::Success(_)));
        assert_eq!(ctl.latest_request(), Some(second.id));

        // Loading, Loading, Success; nothing for the stale request.
        assert_eq!(drain(&mut rx).len(), 3);
    }

    #[test]
    fn stale_outcome_closure_never_runs() {
        let (ctl, _rx) = controller();
        let root = CancellationToken::new();
        let first = ctl.begin(&root);
        let _second = ctl.begin(&root);

        let mut ran = false;
        ctl.complete_with(first.id, || {
            ran = true;
            Ok(payload())
        });
        assert!(!ran);
    }

    #[test]
    fn double_completion_is_ignored() {
        let (ctl, _rx) = controller();
        let root = CancellationToken::new();
        let ticket = ctl.begin(&root);
        assert!(ctl.complete(ticket.id, Err(WidgetError::new("boom"))));
        assert!(!ctl.complete(ticket.id, Ok(payload())));
        assert!(matches!(ctl.status(), WidgetStatus::Error(_)));
    }

    #[test]
    fn retry_after_error_goes_through_loading() {
        let (ctl, mut rx) = controller();
        let root = CancellationToken::new();
        let failed = ctl.begin(&root);
        ctl.complete(failed.id, Err(WidgetError::new("boom")));
        let retry = ctl.begin(&root);
        assert_eq!(ctl.status(), WidgetStatus::Loading);
        ctl.complete(retry.id, Ok(payload()));

        let states: Vec<_> = drain(&mut rx)
            .into_iter()
            .map(|c| match c {
                StatusChange::Widget { status, .. } => std::mem::discriminant(&status),
                other => panic!("unexpected change {:?}", other),
            })
            .collect();
        assert_eq!(states.len(), 4);
        assert_eq!(states[2], std::mem::discriminant(&WidgetStatus::Loading));
    }

    #[test]
    fn fail_in_flight_cancels_and_reports_error() {
        let (ctl, mut rx) = controller();
        let root = CancellationToken::new();
        assert!(!ctl.fail_in_flight(WidgetError::new("stopped")));

        let ticket = ctl.begin(&root);
        assert!(ctl.fail_in_flight(WidgetError::new("stopped")));
        assert!(ticket.token.is_cancelled());
        assert_eq!(ctl.status().error().map(|e| e.message.as_str()), Some("stopped"));

        // The late completion of the abandoned request is ignored.
        assert!(!ctl.complete(ticket.id, Ok(payload())));
        assert!(!ctl.fail_in_flight(WidgetError::new("again")));
        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[test]
    fn parent_cancellation_reaches_ticket() {
        let (ctl, _rx) = controller();
        let root = CancellationToken::new();
        let ticket = ctl.begin(&root);
        root.cancel();
        assert!(ticket.token.is_cancelled());
    }
}
