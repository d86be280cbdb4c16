//! Session identifiers and a registry of per-session extractors

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::ConversationStateExtractor;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

const PREFIX: &str = "session_";

/// Identifier of one chat session, based on UUIDv7
///
/// Rendered as `session_<32 hex digits>`, so ids sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u128);

impl SessionId {
    /// Generate a fresh id
    ///
    /// # Examples
    ///
    /// ```
    /// use draftwright_extractor::SessionId;
    ///
    /// let id = SessionId::new();
    /// let parsed: SessionId = id.to_string().parse().unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, uuid::Uuid::from_u128(self.0).simple())
    }
}

impl FromStr for SessionId {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(PREFIX).unwrap_or(s);
        uuid::Uuid::parse_str(raw)
            .map(|u| Self(u.as_u128()))
            .map_err(|_| ExtractorError::UnknownSession(s.to_string()))
    }
}

/// Extractors keyed by session id
///
/// Every session owns its own [`ConversationStateExtractor`]; nothing is
/// shared between sessions except the configuration they were opened with.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    config: ExtractorConfig,
    sessions: HashMap<SessionId, ConversationStateExtractor>,
}

impl SessionRegistry {
    /// Create a registry whose sessions use the given configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self {
            config,
            sessions: HashMap::new(),
        })
    }

    /// Open a new session
    pub fn open(&mut self) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, self.fresh_extractor());
        debug!("Opened {}", id);
        id
    }

    /// Extractor of a session
    pub fn get(&self, id: SessionId) -> Result<&ConversationStateExtractor, ExtractorError> {
        self.sessions
            .get(&id)
            .ok_or_else(|| ExtractorError::UnknownSession(id.to_string()))
    }

    /// Mutable extractor of a session
    pub fn get_mut(
        &mut self,
        id: SessionId,
    ) -> Result<&mut ConversationStateExtractor, ExtractorError> {
        self.sessions
            .get_mut(&id)
            .ok_or_else(|| ExtractorError::UnknownSession(id.to_string()))
    }

    /// Start over: the old id is retired and a new one with an empty
    /// extractor takes its place
    pub fn reset(&mut self, id: SessionId) -> Result<SessionId, ExtractorError> {
        let mut extractor = self
            .sessions
            .remove(&id)
            .ok_or_else(|| ExtractorError::UnknownSession(id.to_string()))?;
        extractor.reset_session();

        let new_id = SessionId::new();
        self.sessions.insert(new_id, extractor);
        info!("Session {} reset as {}", id, new_id);
        Ok(new_id)
    }

    /// Close a session, dropping its state
    pub fn close(&mut self, id: SessionId) -> Result<(), ExtractorError> {
        self.sessions
            .remove(&id)
            .map(|_| debug!("Closed {}", id))
            .ok_or_else(|| ExtractorError::UnknownSession(id.to_string()))
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is open
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn fresh_extractor(&self) -> ConversationStateExtractor {
        ConversationStateExtractor::from_validated(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftwright_domain::FlowKind;

    #[test]
    fn test_session_id_format() {
        let id = SessionId::new();
        let rendered = id.to_string();
        assert!(rendered.starts_with("session_"));
        assert_eq!(rendered.len(), PREFIX.len() + 32);
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
        assert!("session_nope".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut registry = SessionRegistry::default();
        let a = registry.open();
        let b = registry.open();

        registry.get_mut(a).unwrap().notify_user_message("Buatkan invoice");
        assert_eq!(registry.get(a).unwrap().active_flow(), FlowKind::Invoice);
        assert_eq!(registry.get(b).unwrap().active_flow(), FlowKind::None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reset_retires_old_id() {
        let mut registry = SessionRegistry::default();
        let old = registry.open();
        registry.get_mut(old).unwrap().notify_user_message("Buatkan MoU");

        let new = registry.reset(old).unwrap();
        assert_ne!(old, new);
        assert_eq!(
            registry.get(old).unwrap_err(),
            ExtractorError::UnknownSession(old.to_string())
        );
        assert_eq!(registry.get(new).unwrap().active_flow(), FlowKind::None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_close() {
        let mut registry = SessionRegistry::default();
        let id = registry.open();
        registry.close(id).unwrap();
        assert!(registry.is_empty());
        assert!(registry.close(id).is_err());
    }

    #[test]
    fn test_registry_rejects_invalid_config() {
        let config = ExtractorConfig {
            flow_precedence: vec![],
            ..ExtractorConfig::default()
        };
        assert!(SessionRegistry::new(config).is_err());
    }
}
