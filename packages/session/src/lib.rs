#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-session favorites and preference storage.
//!
//! The feed core computes fresh values per request and never touches
//! persistent state; protocol layers own a [`SessionStore`] and key
//! everything by an opaque session id. [`MemorySessionStore`] backs demo
//! deployments, and the trait leaves room for database-backed stores.

use std::collections::HashMap;

use async_trait::async_trait;
use onthisday_feed_models::Category;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;
use tokio::sync::RwLock;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from session storage operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A backing store query or command failed.
    #[error("Store error: {0}")]
    Store(String),
}

// ---------------------------------------------------------------------------
// Preference types
// ---------------------------------------------------------------------------

/// How a session prefers to discover feed content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiscoveryMode {
    /// Jump to random days.
    Surprise,
    /// Follow curated highlight days.
    Curated,
    /// Walk the calendar in order.
    Chronological,
    /// Group records by theme.
    Thematic,
}

/// Per-session display and discovery preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Categories shown first in feed surfaces.
    pub preferred_categories: Vec<Category>,
    /// Preferred discovery flow.
    pub discovery_mode: DiscoveryMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            preferred_categories: vec![Category::Events, Category::Births],
            discovery_mode: DiscoveryMode::Chronological,
        }
    }
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Session-keyed storage for favorites and preferences.
///
/// Favorites hold record ids in insertion order. Sessions that were never
/// written to read back as empty favorites and default preferences.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Lists a session's favorited record ids, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing store fails.
    async fn favorites(&self, session_id: &str) -> Result<Vec<String>, SessionError>;

    /// Adds a record id to a session's favorites. Duplicate adds are
    /// no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing store fails.
    async fn add_favorite(&self, session_id: &str, record_id: &str) -> Result<(), SessionError>;

    /// Removes a record id from a session's favorites. Unknown ids are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing store fails.
    async fn remove_favorite(&self, session_id: &str, record_id: &str) -> Result<(), SessionError>;

    /// Flips one record id's favorite state, returning `true` when the id
    /// is favorited afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing store fails.
    async fn toggle_favorite(
        &self,
        session_id: &str,
        record_id: &str,
    ) -> Result<bool, SessionError>;

    /// Returns a session's preferences, or defaults for sessions that
    /// never stored any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing store fails.
    async fn preferences(&self, session_id: &str) -> Result<Preferences, SessionError>;

    /// Replaces a session's preferences.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing store fails.
    async fn set_preferences(
        &self,
        session_id: &str,
        preferences: Preferences,
    ) -> Result<(), SessionError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SessionState {
    favorites: Vec<String>,
    preferences: Option<Preferences>,
}

/// In-memory [`SessionStore`] for demo deployments and tests.
///
/// State lives for the process lifetime and is dropped on restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn favorites(&self, session_id: &str) -> Result<Vec<String>, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .map_or_else(Vec::new, |state| state.favorites.clone()))
    }

    async fn add_favorite(&self, session_id: &str, record_id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let state = sessions.entry(session_id.to_string()).or_default();
        if !state.favorites.iter().any(|id| id == record_id) {
            state.favorites.push(record_id.to_string());
        }
        Ok(())
    }

    async fn remove_favorite(
        &self,
        session_id: &str,
        record_id: &str,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        if let Some(state) = sessions.get_mut(session_id) {
            state.favorites.retain(|id| id != record_id);
        }
        Ok(())
    }

    async fn toggle_favorite(
        &self,
        session_id: &str,
        record_id: &str,
    ) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().await;
        let state = sessions.entry(session_id.to_string()).or_default();
        if let Some(position) = state.favorites.iter().position(|id| id == record_id) {
            state.favorites.remove(position);
            Ok(false)
        } else {
            state.favorites.push(record_id.to_string());
            Ok(true)
        }
    }

    async fn preferences(&self, session_id: &str) -> Result<Preferences, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .and_then(|state| state.preferences.clone())
            .unwrap_or_default())
    }

    async fn set_preferences(
        &self,
        session_id: &str,
        preferences: Preferences,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .preferences = Some(preferences);
        Ok(())
    }
}
