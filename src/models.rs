use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened URL held in the session store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    /// Creation time in milliseconds, bumped when needed to stay strictly increasing.
    pub id: i64,
    pub original_url: String,
    pub code: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub clicks: u64,
    pub click_data: Vec<Click>,
}

impl UrlRecord {
    /// Active while `now` has not passed the expiry date (the boundary instant
    /// still counts as active).
    pub fn status_at(&self, now: DateTime<Utc>) -> LinkStatus {
        if now <= self.expiry_date {
            LinkStatus::Active
        } else {
            LinkStatus::Expired
        }
    }

    pub(crate) fn record_click(&mut self, at: DateTime<Utc>) {
        self.clicks += 1;
        self.click_data.push(Click { timestamp: at });
    }
}

/// A single simulated visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Click {
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkStatus {
    Active,
    Expired,
}

impl LinkStatus {
    pub fn label(self) -> &'static str {
        match self {
            LinkStatus::Active => "Active",
            LinkStatus::Expired => "Expired",
        }
    }
}

/// A record annotated with its status for the stats view.
#[derive(Debug, Clone, Serialize)]
pub struct UrlWithStatus {
    #[serde(flatten)]
    pub record: UrlRecord,
    pub status: LinkStatus,
}

/// Raw form state for the shortener. `code` may be blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenForm {
    pub url: String,
    pub code: String,
    pub validity: u32,
}

impl ShortenForm {
    pub fn new(default_validity: u32) -> Self {
        Self {
            url: String::new(),
            code: String::new(),
            validity: default_validity,
        }
    }

    /// Back to a blank form after a successful submission.
    pub fn reset(&mut self, default_validity: u32) {
        *self = Self::new(default_validity);
    }
}

/// Outcome of a visit that counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub target: String,
    pub clicks: u64,
}

impl Visit {
    pub fn message(&self) -> String {
        format!("Redirecting to: {}", self.target)
    }
}
