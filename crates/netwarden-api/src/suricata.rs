// Suricata IDS endpoints
//
// Service status (free-text blob), the structured event feed, and the
// plain-text threat log.

use tracing::debug;

use crate::client::BackendClient;
use crate::error::Error;
use crate::models::{EventsResponse, IdsStatusResponse, ThreatLogResponse};

impl BackendClient {
    /// Get the IDS service status blob.
    ///
    /// `GET /suricata/status`
    pub async fn get_ids_status(&self) -> Result<IdsStatusResponse, Error> {
        let url = self.url("suricata/status")?;
        debug!("fetching IDS status");
        self.get(url).await
    }

    /// List IDS events, optionally filtered server-side.
    ///
    /// `GET /suricata/events?event_type=&time_range=&search=`
    ///
    /// Query parameters are only sent when set.
    pub async fn list_events(
        &self,
        event_type: Option<&str>,
        time_range: Option<&str>,
        search: Option<&str>,
    ) -> Result<EventsResponse, Error> {
        let url = self.url("suricata/events")?;
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(t) = event_type {
            query.push(("event_type", t));
        }
        if let Some(r) = time_range {
            query.push(("time_range", r));
        }
        if let Some(s) = search {
            query.push(("search", s));
        }
        debug!(?event_type, ?time_range, "listing IDS events");
        self.get_query(url, &query).await
    }

    /// Get the raw threat log text.
    ///
    /// `GET /suricata/threat-log`
    pub async fn get_threat_log(&self) -> Result<ThreatLogResponse, Error> {
        let url = self.url("suricata/threat-log")?;
        debug!("fetching threat log");
        self.get(url).await
    }
}
