//! Filter state for the mail log list.
//!
//! A [`FilterState`] holds what the user typed into the filter bar. Only the
//! parts of it that actually narrow the result set end up in the query; see
//! [`FilterState::effective_filter`].

use std::fmt;

/// Query key the endpoint uses for the nested delivery status code.
pub const STATUS_KEY: &str = "status.code";

/// Reserved status value meaning "no status filter".
pub const NO_FILTER: &str = "NOFILTER";

/// Delivery status codes offered by the status selector, in cycle order.
pub const STATUS_CODES: &[&str] = &["sent", "bounced", "deferred", "expired", "reject"];

/// Record field the search value is matched against.
///
/// The query key is the field name itself, so the endpoint filters on
/// `<field>=<value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    /// Postfix queue ID.
    #[default]
    Id,
    /// Recipient address.
    MailTo,
    /// Sender address.
    MailFrom,
    /// `Message-ID` header value.
    MessageId,
}

impl SearchField {
    /// All fields in selector order.
    pub const ALL: [SearchField; 4] = [
        SearchField::Id,
        SearchField::MailTo,
        SearchField::MailFrom,
        SearchField::MessageId,
    ];

    /// The server-recognized parameter name for this field.
    pub fn key(self) -> &'static str {
        match self {
            SearchField::Id => "id",
            SearchField::MailTo => "mail_to",
            SearchField::MailFrom => "mail_from",
            SearchField::MessageId => "message_id",
        }
    }

    /// Human readable label for the filter bar.
    pub fn label(self) -> &'static str {
        match self {
            SearchField::Id => "Queue ID",
            SearchField::MailTo => "Recipient",
            SearchField::MailFrom => "Sender",
            SearchField::MessageId => "Message ID",
        }
    }

    /// The field after this one, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Parses a parameter name back into a field.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Status selector value: either the sentinel or a concrete status code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    Code(String),
}

impl StatusFilter {
    /// Builds a status filter from the selector's raw value. The sentinel
    /// and the empty string both mean "no filter".
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == NO_FILTER {
            StatusFilter::Any
        } else {
            StatusFilter::Code(raw.to_string())
        }
    }

    /// The selector value, [`NO_FILTER`] for [`StatusFilter::Any`].
    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::Any => NO_FILTER,
            StatusFilter::Code(code) => code,
        }
    }

    /// Next entry of the selector: `Any`, then each of [`STATUS_CODES`].
    /// A code outside the list cycles back to `Any`.
    pub fn next(&self) -> Self {
        match self {
            StatusFilter::Any => StatusFilter::Code(STATUS_CODES[0].to_string()),
            StatusFilter::Code(code) => match STATUS_CODES.iter().position(|c| c == code) {
                Some(idx) if idx + 1 < STATUS_CODES.len() => {
                    StatusFilter::Code(STATUS_CODES[idx + 1].to_string())
                }
                _ => StatusFilter::Any,
            },
        }
    }
}

/// Everything the user entered into the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_field: SearchField,
    pub search_value: String,
    pub status: StatusFilter,
}

impl FilterState {
    /// Projects the filter onto query parameters.
    ///
    /// An empty search value contributes nothing whatever field is selected,
    /// and the status sentinel contributes nothing. The search term comes
    /// first, then the status term.
    pub fn effective_filter(&self) -> Vec<(String, String)> {
        let mut terms = Vec::with_capacity(2);
        if !self.search_value.is_empty() {
            terms.push((
                self.search_field.key().to_string(),
                self.search_value.clone(),
            ));
        }
        if let StatusFilter::Code(code) = &self.status {
            terms.push((STATUS_KEY.to_string(), code.clone()));
        }
        terms
    }

    /// True when no term would be sent.
    pub fn is_unfiltered(&self) -> bool {
        self.search_value.is_empty() && self.status == StatusFilter::Any
    }
}
