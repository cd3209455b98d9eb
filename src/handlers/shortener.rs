use crate::{
    models::{LinkStatus, ShortenForm, UrlRecord},
    shortener::{Shortener, COPIED_MESSAGE, SHORTENED_MESSAGE},
    AppState,
};
use askama::Template;
use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

const FLASH_KINDS: [FlashKind; 3] = [FlashKind::Success, FlashKind::Info, FlashKind::Error];

// ── Template structs ───────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "shortener.html")]
struct ShortenerTemplate {
    flash: Option<Flash>,
    url: String,
    code: String,
    validity: u32,
    recent: Vec<RecentRow>,
}

#[derive(Template)]
#[template(path = "stats.html")]
struct StatsTemplate {
    flash: Option<Flash>,
    rows: Vec<StatsRow>,
}

struct RecentRow {
    id: i64,
    original_url: String,
    short_url: String,
    clicks: u64,
    expires: String,
}

struct StatsRow {
    original_url: String,
    short_url: String,
    clicks: u64,
    created: String,
    expires: String,
    status: &'static str,
    status_class: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlashKind {
    Success,
    Info,
    Error,
}

impl FlashKind {
    fn cookie_name(self) -> &'static str {
        match self {
            FlashKind::Success => "flash_success",
            FlashKind::Info => "flash_info",
            FlashKind::Error => "flash_error",
        }
    }
}

struct Flash {
    class: &'static str,
    text: String,
}

impl Flash {
    fn new(kind: FlashKind, text: impl Into<String>) -> Self {
        let class = match kind {
            FlashKind::Success => "success",
            FlashKind::Info => "info",
            FlashKind::Error => "error",
        };
        Self {
            class,
            text: text.into(),
        }
    }
}

// ── Form types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ShortenInput {
    #[serde(default)]
    url: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    validity: String,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /
pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    let shortener = state.shortener.read().await;
    let form = shortener.blank_form();

    (jar, shortener_page(&shortener, &form, flash)).into_response()
}

/// GET /stats
pub async fn stats(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    let shortener = state.shortener.read().await;

    let rows = shortener
        .stats()
        .into_iter()
        .map(|entry| {
            let status_class = match entry.status {
                LinkStatus::Active => "active",
                LinkStatus::Expired => "expired",
            };
            StatsRow {
                original_url: entry.record.original_url,
                short_url: entry.record.short_url,
                clicks: entry.record.clicks,
                created: display_time(entry.record.created_at),
                expires: display_time(entry.record.expiry_date),
                status: entry.status.label(),
                status_class,
            }
        })
        .collect();

    (jar, StatsTemplate { flash, rows }).into_response()
}

/// POST /shorten
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(input): Form<ShortenInput>,
) -> Response {
    let mut form = ShortenForm {
        url: input.url,
        code: input.code,
        validity: parse_validity(&input.validity, state.config.default_validity_minutes),
    };

    let mut shortener = state.shortener.write().await;

    let outcome = shortener.submit(&mut form).map(|r| r.short_url.clone());
    match outcome {
        Ok(short_url) => {
            tracing::debug!("Created {}", short_url);
            set_flash_and_redirect(jar, FlashKind::Success, SHORTENED_MESSAGE, "/")
        }
        Err(e) => {
            tracing::info!("Rejected submission: {}", e);
            // Re-render in place so the user keeps what they typed.
            let flash = Flash::new(FlashKind::Error, e.to_string());
            shortener_page(&shortener, &form, Some(flash)).into_response()
        }
    }
}

/// POST /urls/:id/visit
pub async fn visit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let outcome = state.shortener.write().await.visit(id);
    match outcome {
        Ok(visit) => set_flash_and_redirect(jar, FlashKind::Info, &visit.message(), "/"),
        Err(e) => set_flash_and_redirect(jar, FlashKind::Error, &e.to_string(), "/"),
    }
}

/// POST /urls/:id/copy
///
/// The browser writes the short URL to the clipboard before submitting; this
/// only reports back.
pub async fn copy(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let shortener = state.shortener.read().await;
    match shortener.copy_text(id) {
        Ok(short_url) => {
            tracing::debug!("Copied {}", short_url);
            set_flash_and_redirect(jar, FlashKind::Success, COPIED_MESSAGE, "/")
        }
        Err(e) => set_flash_and_redirect(jar, FlashKind::Error, &e.to_string(), "/"),
    }
}

// ── Private helpers ────────────────────────────────────────────────────────

fn shortener_page(
    shortener: &Shortener,
    form: &ShortenForm,
    flash: Option<Flash>,
) -> ShortenerTemplate {
    let recent = shortener.recent().into_iter().map(recent_row).collect();
    ShortenerTemplate {
        flash,
        url: form.url.clone(),
        code: form.code.clone(),
        validity: form.validity,
        recent,
    }
}

fn recent_row(record: UrlRecord) -> RecentRow {
    RecentRow {
        id: record.id,
        expires: display_time(record.expiry_date),
        original_url: record.original_url,
        short_url: record.short_url,
        clicks: record.clicks,
    }
}

fn display_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Read the validity field the way a lenient number input does: leading
/// digits count, anything unusable (empty, zero, negative, too large) falls
/// back to the default.
pub fn parse_validity(raw: &str, default: u32) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse::<u32>()
        .ok()
        .filter(|&minutes| minutes >= 1)
        .unwrap_or(default)
}

/// Pull the pending flash message (if any) and clear its cookie.
fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let mut jar = jar;
    let mut flash = None;

    for kind in FLASH_KINDS {
        let name = kind.cookie_name();
        if let Some(value) = jar.get(name).map(|c| c.value().to_owned()) {
            if flash.is_none() {
                flash = Some(Flash::new(kind, value));
            }
            let clear = Cookie::build((name, ""))
                .path("/")
                .max_age(time::Duration::seconds(0))
                .build();
            jar = jar.remove(clear);
        }
    }

    (jar, flash)
}

/// Set a flash cookie and redirect to the given path.
fn set_flash_and_redirect(
    jar: CookieJar,
    kind: FlashKind,
    message: &str,
    destination: &str,
) -> Response {
    let cookie = Cookie::build((kind.cookie_name(), message.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(30))
        .build();

    (jar.add(cookie), Redirect::to(destination)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_parsing_falls_back_to_default() {
        assert_eq!(parse_validity("45", 30), 45);
        assert_eq!(parse_validity(" 12 ", 30), 12);
        assert_eq!(parse_validity("7min", 30), 7);
        assert_eq!(parse_validity("", 30), 30);
        assert_eq!(parse_validity("0", 30), 30);
        assert_eq!(parse_validity("-5", 30), 30);
        assert_eq!(parse_validity("abc", 30), 30);
        assert_eq!(parse_validity("99999999999", 30), 30);
    }
}
