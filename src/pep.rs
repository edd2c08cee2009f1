//! PEP status reconciliation.
//!
//! The numerical index lists every PEP with a status letter in an `abbr`
//! marker; each PEP's own page carries the authoritative status. This module
//! builds the set of valid statuses from the index legend, walks the index
//! table, and cross-checks the two, tallying per-status counts and recording
//! disagreements.

use std::future::Future;

use scraper::{ElementRef, Html};
use tracing::info;
use url::Url;

use crate::parse::{find_all, find_tag, require_attr, text_of};
use crate::progress::Progress;
use crate::Result;

/// Valid status labels, in the order the index legend lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusVocabulary {
    statuses: Vec<String>,
}

impl StatusVocabulary {
    /// Extract the legend from the PEP index page: every emphasized label in
    /// the status key list.
    pub fn from_index(doc: &Html) -> Result<Self> {
        let legend = find_tag(doc.root_element(), "section#pep-status-key")?;
        let list = find_tag(legend, "ul.simple")?;
        let mut statuses: Vec<String> = Vec::new();
        for em in find_all(list, "em")? {
            let status = text_of(em);
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        Ok(Self { statuses })
    }

    /// Vocabulary from explicit labels, for when the legend is already known.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut statuses: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !statuses.contains(&label) {
                statuses.push(label);
            }
        }
        Self { statuses }
    }

    pub fn contains(&self, status: &str) -> bool {
        self.statuses.iter().any(|s| s == status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.statuses.iter().map(String::as_str)
    }
}

/// One row of the numerical index: the status declared on the card and the
/// link to the PEP's own page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub declared: String,
    pub link: Url,
}

/// Parse the numerical index table into entries, in table order.
///
/// The declared status is the last word of the `abbr` marker's description:
/// "Informational, Active" declares "Active". A marker without a description
/// declares the empty string.
pub fn index_entries(doc: &Html, base: &Url) -> Result<Vec<IndexEntry>> {
    let section = find_tag(doc.root_element(), "section#numerical-index")?;
    let table = find_tag(section, "tbody")?;
    let mut entries = Vec::new();
    for row in find_all(table, "tr")? {
        let marker = find_tag(row, "abbr")?;
        let description = marker.value().attr("title").unwrap_or_default();
        let declared = description
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_string();
        let anchor = find_tag(row, "a")?;
        let link = base.join(require_attr(anchor, "href")?)?;
        entries.push(IndexEntry { declared, link });
    }
    Ok(entries)
}

/// Per-status counts over a fixed domain: one bucket per vocabulary entry,
/// all starting at zero, in legend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<(String, u64)>,
}

impl Tally {
    fn new(vocabulary: &StatusVocabulary) -> Self {
        Self {
            counts: vocabulary.iter().map(|s| (s.to_string(), 0)).collect(),
        }
    }

    /// Increment the bucket for `status`; false when the status has no bucket.
    fn bump(&mut self, status: &str) -> bool {
        match self.counts.iter_mut().find(|(s, _)| s == status) {
            Some((_, n)) => {
                *n += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, status: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(s, _)| s == status)
            .map(|(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(s, n)| (s.as_str(), *n))
    }

    pub fn sum(&self) -> u64 {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// A PEP whose card status disagrees with its page status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub link: Url,
    pub declared: String,
    pub authoritative: String,
}

/// Everything [`reconcile`] learned about the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub tally: Tally,
    pub mismatches: Vec<Mismatch>,
    pub total: u64,
}

/// Cross-check every index entry against its own page, in order.
///
/// Rows whose page cannot be fetched, or carries no recognizable status,
/// count toward the total and nothing else; the run always visits every row.
/// A page that no longer has the expected structure stops the whole run.
pub async fn reconcile<F, Fut>(
    entries: &[IndexEntry],
    vocabulary: &StatusVocabulary,
    fetch: F,
    progress: &Progress,
) -> Result<Reconciliation>
where
    F: Fn(Url) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut tally = Tally::new(vocabulary);
    let mut mismatches = Vec::new();
    let mut total = 0;

    for entry in entries {
        total += 1;
        progress.inc(1);
        let body = match fetch(entry.link.clone()).await {
            Ok(body) => body,
            // Already logged by the fetcher; the row stays in the total.
            Err(_) => continue,
        };
        let page = Html::parse_document(&body);
        let Some(authoritative) = page_status(&page)? else {
            info!("no status found on {}", entry.link);
            continue;
        };
        if !tally.bump(&authoritative) {
            info!(
                "status {authoritative:?} is not one of {:?} {}",
                vocabulary.statuses, entry.link
            );
        }
        // Compared even when the status is outside the vocabulary.
        if entry.declared != authoritative {
            mismatches.push(Mismatch {
                link: entry.link.clone(),
                declared: entry.declared.clone(),
                authoritative,
            });
        }
    }
    progress.finish();

    Ok(Reconciliation {
        tally,
        mismatches,
        total,
    })
}

/// The status a PEP's own page declares, verbatim (no trimming, no case
/// folding).
///
/// Scans the description list in the content section for a term containing
/// the word `Status`; the following sibling element holds the value. `None`
/// when no such term, or no value, exists.
fn page_status(doc: &Html) -> Result<Option<String>> {
    let content = find_tag(doc.root_element(), "section#pep-content")?;
    let details = find_tag(content, "dl")?;
    for term in find_all(details, "dt")? {
        if text_of(term).contains("Status") {
            let value = term
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .next()
                .map(|node| text_of(node));
            return Ok(value);
        }
    }
    Ok(None)
}
