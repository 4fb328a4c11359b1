//! "Find nearest" pipeline: locate the user, pick the nearest facility,
//! await the route and hand the result to the view.
//!
//! The view is injected; nothing here touches rendering state. Only the most
//! recent request reaches the view, so switching travel mode while a route
//! is still loading never shows the older route.

use std::sync::Mutex;
use std::time::Duration;

use log::debug;
use serde::Serialize;

use crate::geolocation::{PositionProvider, locate};
use crate::loading::MarkerStore;
use crate::routing::{RouteProvider, RouteSession, RoutingClient};
use crate::{Error, Facility, FacilityKind, GeoPoint, RouteResult, RouteSummary, TravelMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient message for the notification area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl From<&Error> for Notice {
    fn from(e: &Error) -> Self {
        let level = if e.is_informational() {
            NoticeLevel::Info
        } else {
            NoticeLevel::Error
        };
        Notice::new(level, e.user_message())
    }
}

/// Everything the map needs to draw a route to a facility
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directions {
    pub user: GeoPoint,
    pub facility: Facility,
    pub straight_line_km: f64,
    pub route: RouteResult,
    pub summary: RouteSummary,
}

/// Presentation side of the pipeline. Implementations own the map layers.
pub trait RouteView: Send + Sync {
    fn show_directions(&self, directions: &Directions);
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone)]
struct Destination {
    user: GeoPoint,
    facility: Facility,
}

#[derive(Debug)]
pub struct DirectionsPlanner<P> {
    session: RouteSession<P>,
    destination: Mutex<Option<Destination>>,
}

impl<P: RouteProvider> DirectionsPlanner<P> {
    pub fn new(client: RoutingClient<P>) -> Self {
        Self {
            session: RouteSession::new(client),
            destination: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &RouteSession<P> {
        &self.session
    }

    /// Facility the current directions lead to
    pub fn destination(&self) -> Option<Facility> {
        self.lock_destination()
            .as_ref()
            .map(|d| d.facility.clone())
    }

    fn lock_destination(&self) -> std::sync::MutexGuard<'_, Option<Destination>> {
        self.destination
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Directions from `user` to `facility`. `None` if superseded.
    pub async fn directions_to(
        &self,
        user: GeoPoint,
        facility: Facility,
        mode: TravelMode,
    ) -> Option<Directions> {
        *self.lock_destination() = Some(Destination {
            user,
            facility: facility.clone(),
        });

        let straight_line_km = crate::geometry::haversine_km(user, facility.location);
        let route = self.session.route(user, facility.location, mode).await?;
        let summary = route.summary();
        Some(Directions {
            user,
            facility,
            straight_line_km,
            route,
            summary,
        })
    }

    /// Directions to the facility of `kind` nearest to `user`
    ///
    /// # Errors
    ///
    /// [`Error::EmptyCollection`] when nothing of that kind is loaded
    pub async fn directions_to_nearest(
        &self,
        store: &MarkerStore,
        kind: FacilityKind,
        user: GeoPoint,
        mode: TravelMode,
    ) -> Result<Option<Directions>, Error> {
        let nearest = store.nearest(kind, user)?;
        debug!(
            "Nearest {kind} is '{}' at {:.3} km",
            nearest.facility.name, nearest.distance_km
        );
        let facility = nearest.facility.clone();
        Ok(self.directions_to(user, facility, mode).await)
    }

    /// Re-routes to the current destination with another travel mode
    pub async fn switch_mode(&self, mode: TravelMode) -> Option<Directions> {
        let destination = self.lock_destination().clone()?;
        self.directions_to(destination.user, destination.facility, mode)
            .await
    }

    /// Forgets the destination and drops any route still in flight
    pub fn clear(&self) {
        self.session.invalidate();
        *self.lock_destination() = None;
    }

    /// Runs the pipeline and reports the outcome to `view`
    pub async fn show_nearest<V: RouteView>(
        &self,
        view: &V,
        store: &MarkerStore,
        kind: FacilityKind,
        user: GeoPoint,
        mode: TravelMode,
    ) {
        match self.directions_to_nearest(store, kind, user, mode).await {
            Ok(Some(directions)) => present(view, &directions),
            Ok(None) => {}
            Err(Error::EmptyCollection) => view.notify(Notice::new(
                NoticeLevel::Info,
                format!("Ingen {} tilgjengelig", kind.label().to_lowercase()),
            )),
            Err(e) => view.notify(Notice::from(&e)),
        }
    }

    /// [`Self::switch_mode`], reported to `view`
    pub async fn show_mode<V: RouteView>(&self, view: &V, mode: TravelMode) {
        if let Some(directions) = self.switch_mode(mode).await {
            present(view, &directions);
        }
    }

    /// Locates the user first, then behaves like [`Self::show_nearest`]
    pub async fn locate_and_show<V: RouteView, L: PositionProvider>(
        &self,
        view: &V,
        locator: &L,
        timeout: Duration,
        store: &MarkerStore,
        kind: FacilityKind,
        mode: TravelMode,
    ) {
        view.notify(Notice::new(NoticeLevel::Info, "Finner din posisjon..."));

        let user = match locate(locator, timeout).await {
            Ok(user) => user,
            Err(e) => {
                view.notify(Notice::from(&e));
                return;
            }
        };

        view.notify(Notice::new(
            NoticeLevel::Success,
            format!(
                "Posisjon funnet! Finner nærmeste {}...",
                kind.label().to_lowercase()
            ),
        ));
        self.show_nearest(view, store, kind, user, mode).await;
    }
}

fn present<V: RouteView>(view: &V, directions: &Directions) {
    if directions.route.fallback {
        view.notify(Notice::new(
            NoticeLevel::Warning,
            "Fant ingen rute. Viser luftlinje med estimert tid.",
        ));
    }
    view.show_directions(directions);
}
