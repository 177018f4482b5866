use std::future::Future;

use serde_json::Value;

use crate::backend::BackendClient;
use crate::error::AcResult;
use crate::storage::{LocalStore, PREFERENCES_KEY};

use super::{Preferences, PreferencesUpdate};

/// Remote copy of a user's preferences.
pub trait PreferenceSync {
    fn fetch(&self, user_id: i64) -> impl Future<Output = AcResult<Value>> + Send;
    fn push(
        &self,
        user_id: i64,
        preferences: &Preferences,
    ) -> impl Future<Output = AcResult<()>> + Send;
}

impl PreferenceSync for BackendClient {
    async fn fetch(&self, user_id: i64) -> AcResult<Value> {
        self.fetch_preferences(user_id).await
    }

    async fn push(&self, user_id: i64, preferences: &Preferences) -> AcResult<()> {
        self.save_preferences(user_id, preferences).await
    }
}

/// Preferences kept under `ac_prefs`, mirrored to the server for a signed-in
/// user. The server is never required: its failures are logged and skipped.
pub struct PreferencesStore<'a, S: PreferenceSync = BackendClient> {
    local: &'a LocalStore,
    remote: Option<&'a S>,
}

impl<'a> PreferencesStore<'a, BackendClient> {
    pub fn local_only(local: &'a LocalStore) -> Self {
        Self {
            local,
            remote: None,
        }
    }
}

impl<'a, S: PreferenceSync> PreferencesStore<'a, S> {
    pub fn new(local: &'a LocalStore, remote: Option<&'a S>) -> Self {
        Self { local, remote }
    }

    pub fn local(&self) -> Preferences {
        self.local
            .get_json::<Value>(PREFERENCES_KEY)
            .map(|value| Preferences::from_json(&value))
            .unwrap_or_default()
    }

    fn signed_in_remote(&self) -> Option<(&'a S, i64)> {
        let remote = self.remote?;
        let user = self.local.user()?;
        Some((remote, user.user_id))
    }

    /// Local values first, then the server's on top. A successful fetch is
    /// written back locally.
    pub async fn load(&self) -> Preferences {
        match self.fetch_merged().await {
            Some(preferences) => {
                if let Err(e) = self.local.set_json(PREFERENCES_KEY, &preferences) {
                    log::error!("Error storing merged preferences: {e}");
                }
                preferences
            }
            None => self.local(),
        }
    }

    /// The local preferences with the server's on top, `None` when there is no
    /// signed-in server copy to read. Nothing is written.
    pub async fn fetch_merged(&self) -> Option<Preferences> {
        let (remote, user_id) = self.signed_in_remote()?;
        let mut preferences = self.local();
        match remote.fetch(user_id).await {
            Ok(server) => {
                preferences.overlay(&server);
                Some(preferences)
            }
            Err(e) => {
                log::error!("Error loading server preferences: {e}");
                None
            }
        }
    }

    /// Merges `update` into the local preferences and stores them. Only the
    /// local write can fail; the server push is best effort.
    pub async fn update(&self, update: &PreferencesUpdate) -> AcResult<Preferences> {
        let preferences = self.store_update(update)?;
        self.push(&preferences).await;
        Ok(preferences)
    }

    /// The local half of `update`.
    pub fn store_update(&self, update: &PreferencesUpdate) -> AcResult<Preferences> {
        let preferences = self.local().merged(update);
        self.store(&preferences)?;
        Ok(preferences)
    }

    pub fn store(&self, preferences: &Preferences) -> AcResult<()> {
        self.local.set_json(PREFERENCES_KEY, preferences)
    }

    /// Sends the preferences to the server of a signed-in user, logging failures.
    pub async fn push(&self, preferences: &Preferences) {
        if let Some((remote, user_id)) = self.signed_in_remote()
            && let Err(e) = remote.push(user_id, preferences).await
        {
            log::error!("Error saving preferences to server: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::AcError;
    use crate::preferences::{InteractionMode, Language, Theme};
    use crate::storage::USER_KEY;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_log::test;

    #[derive(Default)]
    struct StubServer {
        stored: Option<Value>,
        pushed: Mutex<Vec<(i64, Preferences)>>,
    }

    impl PreferenceSync for StubServer {
        async fn fetch(&self, _user_id: i64) -> AcResult<Value> {
            self.stored.clone().ok_or(AcError::HttpStatus(500))
        }

        async fn push(&self, user_id: i64, preferences: &Preferences) -> AcResult<()> {
            self.pushed.lock().unwrap().push((user_id, *preferences));
            if self.stored.is_some() {
                Ok(())
            } else {
                Err(AcError::HttpStatus(500))
            }
        }
    }

    fn signed_in_store() -> LocalStore {
        let local = LocalStore::in_memory();
        local
            .set_item(USER_KEY, r#"{"user_id": 3, "email": "a@b.in"}"#)
            .unwrap();
        local
            .set_item(PREFERENCES_KEY, r#"{"language": "ta", "theme": "dark"}"#)
            .unwrap();
        local
    }

    #[test(tokio::test)]
    async fn test_load_without_user_uses_local() {
        let local = LocalStore::in_memory();
        assert_eq!(PreferencesStore::local_only(&local).load().await, Preferences::default());

        local.set_item(PREFERENCES_KEY, "not json").unwrap();
        assert_eq!(PreferencesStore::local_only(&local).load().await, Preferences::default());
    }

    #[test(tokio::test)]
    async fn test_server_wins_and_is_written_back() {
        let local = signed_in_store();
        let server = StubServer {
            stored: Some(json!({"theme": "high-contrast", "mode": "voice"})),
            ..Default::default()
        };

        let preferences = PreferencesStore::new(&local, Some(&server)).load().await;
        let expected = Preferences {
            language: Language::Ta,
            theme: Theme::HighContrast,
            mode: InteractionMode::Voice,
        };
        assert_eq!(preferences, expected);
        assert_eq!(PreferencesStore::local_only(&local).local(), expected);
    }

    #[test(tokio::test)]
    async fn test_server_failure_keeps_local() {
        let local = signed_in_store();
        let server = StubServer::default();

        let preferences = PreferencesStore::new(&local, Some(&server)).load().await;
        assert_eq!(preferences.theme, Theme::Dark);
        assert_eq!(preferences.language, Language::Ta);
    }

    #[test(tokio::test)]
    async fn test_update_survives_push_failure() {
        let local = signed_in_store();
        let server = StubServer::default();
        let store = PreferencesStore::new(&local, Some(&server));

        let updated = store
            .update(&PreferencesUpdate {
                theme: Some(Theme::Light),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.theme, Theme::Light);
        assert_eq!(updated.language, Language::Ta);
        assert_eq!(store.local(), updated);
        assert_eq!(*server.pushed.lock().unwrap(), vec![(3, updated)]);
    }

    #[test(tokio::test)]
    async fn test_fetch_merged_writes_nothing() {
        let local = signed_in_store();
        let server = StubServer {
            stored: Some(json!({"theme": "light"})),
            ..Default::default()
        };
        let store = PreferencesStore::new(&local, Some(&server));

        let merged = store.fetch_merged().await.unwrap();
        assert_eq!(merged.theme, Theme::Light);
        assert_eq!(store.local().theme, Theme::Dark);

        assert_eq!(PreferencesStore::local_only(&local).fetch_merged().await, None);
    }
}
