use std::sync::{Arc, LazyLock};

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;

use crate::{
    clock::Clock,
    codegen::{self, CodeSource},
    error::{ShortenError, VisitError},
    models::{ShortenForm, UrlRecord, UrlWithStatus, Visit},
    store::RecordStore,
};

pub const SHORTENED_MESSAGE: &str = "URL shortened successfully!";
pub const COPIED_MESSAGE: &str = "Copied!";

static URL_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+").expect("URL pattern is valid"));

/// Settings the shortener needs from the app configuration.
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Prefix for short URLs, without a trailing slash.
    pub base_url: String,
    pub default_validity: u32,
    pub recent_limit: usize,
}

/// The whole session: the record store plus the pieces needed to create and
/// visit records.
pub struct Shortener {
    store: RecordStore,
    clock: Arc<dyn Clock>,
    codes: Box<dyn CodeSource>,
    settings: ShortenerSettings,
}

impl Shortener {
    pub fn new(
        settings: ShortenerSettings,
        clock: Arc<dyn Clock>,
        codes: Box<dyn CodeSource>,
    ) -> Self {
        Self {
            store: RecordStore::new(),
            clock,
            codes,
            settings,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// A blank form with the default validity filled in.
    pub fn blank_form(&self) -> ShortenForm {
        ShortenForm::new(self.settings.default_validity)
    }

    /// Validate `form`, pick a code and append a new record.
    ///
    /// On success the form is cleared. On failure neither the form nor the
    /// store is touched.
    pub fn submit(&mut self, form: &mut ShortenForm) -> Result<&UrlRecord, ShortenError> {
        validate_url(&form.url)?;

        let code = self.resolve_code(form.code.trim())?;

        let now = self.clock.now();
        let validity = form.validity.max(1);
        // u32 minutes always fit a TimeDelta; only the far end of the calendar can overflow.
        let expiry_date = now
            .checked_add_signed(TimeDelta::minutes(i64::from(validity)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        // Timestamp ids, nudged forward when two submissions land in the same millisecond.
        let id = match self.store.last_id() {
            Some(last) => now.timestamp_millis().max(last + 1),
            None => now.timestamp_millis(),
        };

        let record = UrlRecord {
            id,
            original_url: form.url.clone(),
            short_url: format!("{}/{}", self.settings.base_url, code),
            code,
            created_at: now,
            expiry_date,
            clicks: 0,
            click_data: Vec::new(),
        };

        tracing::info!(
            "Shortened {} as {} (valid {} min)",
            record.original_url,
            record.code,
            validity
        );

        form.reset(self.settings.default_validity);
        Ok(self.store.append(record))
    }

    fn resolve_code(&mut self, requested: &str) -> Result<String, ShortenError> {
        if !requested.is_empty() {
            if !self.store.contains_code(requested) {
                return Ok(requested.to_owned());
            }
            tracing::info!(
                "Custom code '{}' is taken, falling back to a random one",
                requested
            );
        }
        let store = &self.store;
        codegen::allocate_unique(self.codes.as_mut(), |c| store.contains_code(c))
    }

    /// Simulate following the short link for record `id`.
    pub fn visit(&mut self, id: i64) -> Result<Visit, VisitError> {
        let now = self.clock.now();
        let record = self.store.get_mut(id).ok_or_else(|| {
            tracing::warn!("Visit for unknown record {}", id);
            VisitError::NotFound
        })?;

        if now > record.expiry_date {
            tracing::warn!("Visit to expired code {}", record.code);
            return Err(VisitError::Expired);
        }

        record.record_click(now);
        Ok(Visit {
            target: record.original_url.clone(),
            clicks: record.clicks,
        })
    }

    /// The short URL a copy action puts on the clipboard.
    pub fn copy_text(&self, id: i64) -> Result<&str, VisitError> {
        self.store
            .get(id)
            .map(|r| r.short_url.as_str())
            .ok_or(VisitError::NotFound)
    }

    /// Most recently created records, newest first.
    pub fn recent(&self) -> Vec<UrlRecord> {
        self.store
            .recent(self.settings.recent_limit)
            .cloned()
            .collect()
    }

    /// Every record in creation order with its status as of now.
    pub fn stats(&self) -> Vec<UrlWithStatus> {
        let now = self.clock.now();
        self.store
            .iter()
            .map(|r| UrlWithStatus {
                status: r.status_at(now),
                record: r.clone(),
            })
            .collect()
    }
}

fn validate_url(url: &str) -> Result<(), ShortenError> {
    if url.trim().is_empty() {
        return Err(ShortenError::UrlRequired);
    }
    if !URL_FORMAT.is_match(url) {
        return Err(ShortenError::InvalidUrl);
    }
    Ok(())
}
