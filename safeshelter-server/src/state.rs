use std::sync::Arc;

use safeshelter_core::loading::fetch_all;
use safeshelter_core::prelude::*;
use tokio::sync::RwLock;

use crate::chat::ChatClient;
use crate::config::Config;
use crate::error::ApiError;

/// Shared handles used by the request handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<MarkerStore>>,
    pub routing: RoutingClient<OsrmClient>,
    pub geocoder: NominatimClient,
    /// `None` when no database URL is configured
    pub source: Option<SupabaseSource>,
    pub chat: ChatClient,
    pub reports: Arc<RwLock<ReportBoard>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let source = match SupabaseSource::new(config.supabase.clone()) {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!("Marker data source disabled: {e}");
                None
            }
        };

        Ok(Self::new(
            MarkerStore::new(),
            RoutingClient::new(OsrmClient::new(config.routing.clone())?),
            NominatimClient::new(config.geocoding.clone())?,
            source,
            ChatClient::new(config.chat.clone())?,
        ))
    }

    pub fn new(
        mut store: MarkerStore,
        routing: RoutingClient<OsrmClient>,
        geocoder: NominatimClient,
        source: Option<SupabaseSource>,
        chat: ChatClient,
    ) -> Self {
        store.on_facilities_loaded(|store| {
            tracing::info!(
                shelters = store.count(FacilityKind::Shelter),
                fire_stations = store.count(FacilityKind::FireStation),
                hospitals = store.count(FacilityKind::Hospital),
                shelter_capacity = store.total_capacity(),
                "Marker data ready"
            );
        });

        Self {
            store: Arc::new(RwLock::new(store)),
            routing,
            geocoder,
            source,
            chat,
            reports: Arc::new(RwLock::new(ReportBoard::new())),
        }
    }

    pub fn source(&self) -> Result<&SupabaseSource, ApiError> {
        self.source.as_ref().ok_or(ApiError::NotConfigured("Database"))
    }

    /// Re-fetches every facility table; the newest fetch replaces the store contents
    pub async fn reload(&self) -> Result<LoadSummary, ApiError> {
        let loaded = fetch_all(self.source()?).await;
        Ok(self.store.write().await.apply(loaded))
    }
}
