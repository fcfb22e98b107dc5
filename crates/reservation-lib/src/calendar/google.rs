//! Google Calendar v3 REST client

use super::{CalendarClient, CreatedEvent, ExpirationEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const GOOGLE_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3/";

/// Largest pages the listing endpoints accept
const CALENDAR_LIST_PAGE_SIZE: &str = "250";
const EVENTS_PAGE_SIZE: &str = "2500";

/// Google Calendar client authenticated with an OAuth access token
pub struct GoogleCalendarClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarListEntry {
    id: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    id: String,
}

impl GoogleCalendarClient {
    /// Create a new client against `base_url`
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid calendar API URL")?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.into(),
        })
    }

    /// Client against the public Google endpoint
    pub fn with_token(access_token: impl Into<String>) -> Result<Self> {
        Self::new(GOOGLE_CALENDAR_API_URL, access_token)
    }

    /// Base URL extended with percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Calendar API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Calendar API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: Url, body: &B) -> Result<T> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Calendar API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Fetch every page of a listing endpoint
    async fn collect_pages<T: DeserializeOwned>(
        &self,
        base: Url,
        extra_query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = {
                let mut pairs: Vec<(&str, &str)> = extra_query.to_vec();
                if let Some(token) = &page_token {
                    pairs.push(("pageToken", token.as_str()));
                }

                let mut url = base.clone();
                if !pairs.is_empty() {
                    url.query_pairs_mut().extend_pairs(pairs);
                }
                url
            };

            let page: Page<T> = self.get(url).await?;
            debug!(items = page.items.len(), "Fetched calendar page");
            items.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn find_calendar_id(&self, name: &str) -> Result<Option<String>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let entries: Vec<CalendarListEntry> = self
            .collect_pages(url, &[("maxResults", CALENDAR_LIST_PAGE_SIZE)])
            .await
            .context("Failed to list calendars")?;

        Ok(entries
            .into_iter()
            .find(|entry| entry.summary == name)
            .map(|entry| entry.id))
    }

    async fn list_event_ids(&self, calendar_id: &str) -> Result<HashSet<String>> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        // Deleted events keep their id reserved, so they count as present
        let events: Vec<EventEntry> = self
            .collect_pages(
                url,
                &[("showDeleted", "true"), ("maxResults", EVENTS_PAGE_SIZE)],
            )
            .await
            .context("Failed to list calendar events")?;

        Ok(events.into_iter().map(|e| e.id).collect())
    }

    async fn create_event(&self, calendar_id: &str, event: &ExpirationEvent) -> Result<CreatedEvent> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        self.post(url, event)
            .await
            .with_context(|| format!("Failed to insert event {}", event.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_calendar_id() {
        let client = GoogleCalendarClient::with_token("token").unwrap();
        let url = client
            .endpoint(&["calendars", "team#aws@group.calendar.google.com", "events"])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team%23aws@group.calendar.google.com/events"
        );
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let client = GoogleCalendarClient::new("http://localhost:1234/calendar/v3", "t").unwrap();
        let url = client.endpoint(&["users", "me", "calendarList"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/calendar/v3/users/me/calendarList");
    }
}
