//! Platform language settings view
//!
//! Admins enable, disable and pick the default storefront language. The rules
//! are checked locally before any request is sent:
//! - at least one language stays enabled
//! - the default language cannot be disabled
//! - only an enabled language can become the default
//!
//! A rejected action changes nothing and shows an error banner.

use reqwest::Method;
use tracing::info;
use crate::models::{LanguageSetting, UpdateLanguageRequest};
use crate::services::session::SessionStore;
use crate::services::source::DataSource;
use crate::state::optimistic::{update_where, OptimisticCommand};
use crate::state::resource::{FetchOutcome, ResourceSpec, ResourceView};
use crate::utils::errors::{ViewError, Result};
use crate::utils::helpers::resource_path;
use crate::views::banner::BannerSlot;

const LANGUAGES_PATH: &str = "/api/platform/languages";
const LANGUAGES_RESOURCE: &str = "languages";

fn find<'a>(languages: &'a [LanguageSetting], code: &str) -> Result<&'a LanguageSetting> {
    languages
        .iter()
        .find(|language| language.code == code)
        .ok_or_else(|| ViewError::Rejected(format!("Language {} is not configured", code)))
}

/// Decide what toggling `code` does: `Ok(true)` enables it, `Ok(false)` disables it
pub fn plan_toggle(languages: &[LanguageSetting], code: &str) -> Result<bool> {
    let language = find(languages, code)?;

    if !language.enabled {
        return Ok(true);
    }
    if language.is_default {
        return Err(ViewError::Rejected(
            "The default language cannot be disabled".to_string(),
        ));
    }
    if languages.iter().filter(|l| l.enabled).count() <= 1 {
        return Err(ViewError::Rejected(
            "At least one language must remain enabled".to_string(),
        ));
    }

    Ok(false)
}

/// Decide whether `code` can become the default; `Ok(false)` when it already is
pub fn plan_set_default(languages: &[LanguageSetting], code: &str) -> Result<bool> {
    let language = find(languages, code)?;

    if !language.enabled {
        return Err(ViewError::Rejected(
            "Only an enabled language can be the default".to_string(),
        ));
    }

    Ok(!language.is_default)
}

/// Language settings screen state
#[derive(Debug)]
pub struct LanguageSettings {
    view: ResourceView,
    banner: BannerSlot,
}

impl LanguageSettings {
    pub fn new(source: DataSource) -> Self {
        let specs = vec![ResourceSpec::enveloped(LANGUAGES_RESOURCE, LANGUAGES_PATH, "languages")];

        Self {
            view: ResourceView::new("languages", source, specs),
            banner: BannerSlot::default(),
        }
    }

    pub async fn mount(&self) -> Result<FetchOutcome> {
        self.view.refresh().await.map_err(|e| {
            self.banner.from_error(&e);
            e
        })
    }

    pub fn view(&self) -> &ResourceView {
        &self.view
    }

    pub fn banner(&self) -> &BannerSlot {
        &self.banner
    }

    pub fn languages(&self) -> Result<Vec<LanguageSetting>> {
        self.view.state().items(LANGUAGES_RESOURCE)
    }

    pub fn enabled_languages(&self) -> Result<Vec<LanguageSetting>> {
        Ok(self.languages()?.into_iter().filter(|l| l.enabled).collect())
    }

    pub fn default_language(&self) -> Result<Option<LanguageSetting>> {
        Ok(self.languages()?.into_iter().find(|l| l.is_default))
    }

    /// Enable a disabled language or disable an enabled one
    pub async fn toggle(&self, code: &str) -> Result<()> {
        let languages = self.languages()?;
        let enable = match plan_toggle(&languages, code) {
            Ok(enable) => enable,
            Err(e) => {
                self.banner.from_error(&e);
                return Err(e);
            }
        };

        let path = resource_path(LANGUAGES_PATH, code, None);
        let body = serde_json::to_value(UpdateLanguageRequest {
            enabled: Some(enable),
            ..Default::default()
        })?;
        let action = if enable { "enable" } else { "disable" };
        let source = self.view.source();

        let result = OptimisticCommand::<LanguageSetting>::new(&self.view, LANGUAGES_RESOURCE, action, code)
            .run(
                |languages| update_where(languages, |l| l.code == code, |l| l.enabled = enable),
                || source.send(Method::PATCH, &path, Some(body)),
            )
            .await;

        match result {
            Ok(_) => {
                let name = find(&languages, code).map(|l| l.name.clone()).unwrap_or_else(|_| code.to_string());
                info!(language = code, enabled = enable, "Language toggled");
                self.banner.success(format!("{} {}", name, if enable { "enabled" } else { "disabled" }));
                Ok(())
            }
            Err(e) => {
                self.banner.from_error(&e);
                Err(e)
            }
        }
    }

    /// Make an enabled language the storefront default
    pub async fn set_default(&self, code: &str) -> Result<()> {
        let languages = self.languages()?;
        match plan_set_default(&languages, code) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e) => {
                self.banner.from_error(&e);
                return Err(e);
            }
        }

        let path = resource_path(LANGUAGES_PATH, code, None);
        let body = serde_json::to_value(UpdateLanguageRequest {
            is_default: Some(true),
            ..Default::default()
        })?;
        let source = self.view.source();

        let result = OptimisticCommand::<LanguageSetting>::new(&self.view, LANGUAGES_RESOURCE, "set_default", code)
            .run(
                |languages| update_where(languages, |_| true, |l| l.is_default = l.code == code),
                || source.send(Method::PATCH, &path, Some(body)),
            )
            .await;

        match result {
            Ok(_) => {
                info!(language = code, "Default language changed");
                self.banner.success("Default language updated");
                Ok(())
            }
            Err(e) => {
                self.banner.from_error(&e);
                Err(e)
            }
        }
    }

    /// Switch the signed-in user's UI language to an enabled language
    pub async fn choose_ui_language(&self, session: &SessionStore, code: &str) -> Result<()> {
        let languages = self.languages()?;
        let language = find(&languages, code)?;
        if !language.enabled {
            let e = ViewError::Rejected(format!("{} is not available", language.name));
            self.banner.from_error(&e);
            return Err(e);
        }

        session.set_language(code).await
    }

    pub fn close(&self) {
        self.view.close();
    }
}

impl Drop for LanguageSettings {
    fn drop(&mut self) {
        self.view.close();
    }
}
