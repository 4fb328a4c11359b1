use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use super::client::{RouteProvider, RoutingClient};
use crate::{GeoPoint, RouteResult, TravelMode};

/// Last-request-wins wrapper around a [`RoutingClient`].
///
/// Every call takes a new generation number. A result is returned only if no
/// newer call was issued while it was in flight; stale results are dropped.
/// Superseded requests are not cancelled at the transport level.
#[derive(Debug)]
pub struct RouteSession<P> {
    client: RoutingClient<P>,
    generation: AtomicU64,
}

impl<P: RouteProvider> RouteSession<P> {
    pub fn new(client: RoutingClient<P>) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &RoutingClient<P> {
        &self.client
    }

    /// Generation of the most recent request
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Drops whatever is in flight, e.g. when the directions view closes
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Requests a route. `None` means a newer request superseded this one.
    pub async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        mode: TravelMode,
    ) -> Option<RouteResult> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.client.route(start, end, mode).await;

        if self.generation.load(Ordering::SeqCst) == ticket {
            Some(result)
        } else {
            debug!("Discarding stale {mode} route (request {ticket})");
            None
        }
    }
}
