//! Light/dark theme preference
//!
//! The controller is created once at startup and handed to whoever needs it.
//! Every change is written to the preference store before the new value is
//! published to the document root watchers.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::Result;
use crate::store::PreferenceStore;

/// Preference key of the persisted theme
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class name applied to the document root
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a persisted theme name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of the current theme
pub struct ThemeController<S> {
    store: S,
    root: watch::Sender<Theme>,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Restore the persisted theme, or start with light
    #[instrument(level = "debug", skip(store))]
    pub async fn init(store: S) -> Result<Self> {
        let stored: Option<String> = store.get(THEME_KEY).await?;
        let theme = match stored.as_deref() {
            Some(name) => Theme::from_name(name).unwrap_or_else(|| {
                warn!("Ignoring unknown persisted theme '{}'", name);
                Theme::default()
            }),
            None => Theme::default(),
        };
        info!(%theme, "Theme initialized");

        let (root, _) = watch::channel(theme);
        Ok(Self { store, root })
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        *self.root.borrow()
    }

    /// Receiver tracking the root attribute
    #[must_use]
    pub fn watch_root(&self) -> watch::Receiver<Theme> {
        self.root.subscribe()
    }

    /// Flip the theme, persist it and publish it
    pub async fn toggle(&mut self) -> Result<Theme> {
        let next = self.current().toggled();
        self.set(next).await?;
        Ok(next)
    }

    /// Persist and publish `theme`. Nothing changes if persisting fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn set(&mut self, theme: Theme) -> Result<()> {
        self.store.put(THEME_KEY, theme.as_str().to_string()).await?;
        self.root.send_replace(theme);
        info!(%theme, "Theme changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPreferenceStore;

    #[tokio::test]
    async fn test_defaults_to_light_without_preference() {
        let controller = ThemeController::init(MemoryPreferenceStore::new())
            .await
            .unwrap();
        assert_eq!(controller.current(), Theme::Light);
    }

    #[tokio::test]
    async fn test_restores_persisted_theme() {
        let store = MemoryPreferenceStore::new();
        store.put(THEME_KEY, "dark".to_string()).await.unwrap();
        let controller = ThemeController::init(store).await.unwrap();
        assert_eq!(controller.current(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_unknown_persisted_value_falls_back_to_light() {
        let store = MemoryPreferenceStore::new();
        store.put(THEME_KEY, "sepia".to_string()).await.unwrap();
        let controller = ThemeController::init(store).await.unwrap();
        assert_eq!(controller.current(), Theme::Light);
    }

    #[tokio::test]
    async fn test_double_toggle_restores_original_and_persists_each_step() {
        let store = MemoryPreferenceStore::new();
        let mut controller = ThemeController::init(store.clone()).await.unwrap();

        assert_eq!(controller.toggle().await.unwrap(), Theme::Dark);
        let persisted: Option<String> = store.get(THEME_KEY).await.unwrap();
        assert_eq!(persisted.as_deref(), Some("dark"));

        assert_eq!(controller.toggle().await.unwrap(), Theme::Light);
        let persisted: Option<String> = store.get(THEME_KEY).await.unwrap();
        assert_eq!(persisted.as_deref(), Some(controller.current().as_str()));
    }

    #[tokio::test]
    async fn test_root_watchers_see_changes() {
        let mut controller = ThemeController::init(MemoryPreferenceStore::new())
            .await
            .unwrap();
        let root = controller.watch_root();
        controller.toggle().await.unwrap();
        assert_eq!(*root.borrow(), Theme::Dark);
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(Theme::from_name("dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_name("Dark"), None);
        assert_eq!(Theme::Light.to_string(), "light");
    }
}
