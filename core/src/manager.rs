//! Provider registry and union queries.
//!
//! The manager owns an ordered list of providers. Queries run against each
//! provider in registration order, one after another, and concatenate the
//! results. Nothing is deduplicated: an event offered by two providers
//! appears twice.

use crate::category::Category;
use crate::error::{EventError, Result};
use crate::event::Event;
use crate::filter::EventFilter;
use crate::month_day::MonthDay;
use crate::provider::{EventProvider, ProviderFuture};
use futures::StreamExt;
use std::sync::Arc;

/// Registry of event providers.
///
/// Registration takes `&mut self`, so providers cannot be added while a query
/// borrowed from the manager is running.
#[derive(Clone, Default)]
pub struct EventManager {
    providers: Vec<Arc<dyn EventProvider>>,
}

impl EventManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::DuplicateProviderIdentifier`] if a provider with
    /// exactly the same identifier is already registered. The registry is
    /// left unchanged.
    pub fn try_add_event_provider(&mut self, provider: Arc<dyn EventProvider>) -> Result<()> {
        let identifier = provider.identifier();
        if self.providers.iter().any(|p| p.identifier() == identifier) {
            tracing::debug!(provider = %identifier, "Event provider already registered");
            return Err(EventError::DuplicateProviderIdentifier(identifier.to_string()));
        }

        tracing::debug!(provider = %identifier, position = self.providers.len(), "Event provider registered");
        self.providers.push(provider);
        Ok(())
    }

    /// Register `provider`, returning whether it was added.
    pub fn add_event_provider(&mut self, provider: Arc<dyn EventProvider>) -> bool {
        self.try_add_event_provider(provider).is_ok()
    }

    /// Registered providers in registration order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn EventProvider>] {
        &self.providers
    }

    /// The provider registered under `identifier`, compared case-insensitively.
    #[must_use]
    pub fn provider(&self, identifier: &str) -> Option<&Arc<dyn EventProvider>> {
        self.providers
            .iter()
            .find(|p| p.identifier().eq_ignore_ascii_case(identifier))
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Every event of every provider.
    pub async fn events(&self) -> Vec<Event> {
        self.collect(|p| p.events()).await
    }

    /// Events falling on `month_day`, from every provider.
    pub async fn events_of_date(&self, month_day: MonthDay) -> Vec<Event> {
        self.collect(|p| p.events_of_date(month_day)).await
    }

    /// Events matched by `category`, from every provider.
    pub async fn events_of_category(&self, category: &Category) -> Vec<Event> {
        self.collect(|p| p.events_of_category(category)).await
    }

    /// Every event of every provider that passes `filter`.
    pub async fn filtered_events(&self, filter: &dyn EventFilter) -> Vec<Event> {
        self.events()
            .await
            .into_iter()
            .filter(|event| filter.accepts(event))
            .collect()
    }

    async fn collect<'a, F>(&'a self, query: F) -> Vec<Event>
    where
        F: Fn(&'a dyn EventProvider) -> ProviderFuture<'a>,
    {
        futures::stream::iter(&self.providers)
            .then(|provider| {
                let future = query(provider.as_ref());
                async move {
                    let events = future.await;
                    tracing::trace!(provider = %provider.identifier(), events = events.len(), "Provider answered");
                    events
                }
            })
            .concat()
            .await
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let identifiers: Vec<&str> = self.providers.iter().map(|p| p.identifier()).collect();
        f.debug_struct("EventManager")
            .field("providers", &identifiers)
            .finish()
    }
}
