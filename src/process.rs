//! The four scrape workflows.
//!
//! Each returns `Ok(None)` when its index page is unreachable (logged,
//! nothing to report) or when the mode produces no rows; structural failures
//! propagate and end the run.

use std::path::Path;

use regex::Regex;
use scraper::Html;
use tokio::fs;
use tracing::{error, info};
use url::Url;

use crate::parse::{find_all, find_tag, require_attr, text_of};
use crate::pep::{index_entries, reconcile, StatusVocabulary};
use crate::progress::Progress;
use crate::request::CachedClient;
use crate::{Error, Result, DOWNLOADS_DIR, MAIN_DOC_URL, PEP_URL};

/// Result rows; the first row is the header.
pub type Rows = Vec<Vec<String>>;

fn header(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// Articles about what's new in each Python version: link, title and the
/// editor/author line from each article.
pub async fn whats_new(client: &CachedClient) -> Result<Option<Rows>> {
    let whats_new_url = Url::parse(MAIN_DOC_URL)?.join("whatsnew/")?;
    let Ok(body) = client.get_text(&whats_new_url).await else {
        return Ok(None);
    };

    let mut article_links = Vec::new();
    {
        let doc = Html::parse_document(&body);
        let main_section = find_tag(doc.root_element(), "section#what-s-new-in-python")?;
        let toctree = find_tag(main_section, "div.toctree-wrapper")?;
        for item in find_all(toctree, "li.toctree-l1")? {
            let anchor = find_tag(item, "a")?;
            article_links.push(whats_new_url.join(require_attr(anchor, "href")?)?);
        }
    }

    let mut results = vec![header(&["Article link", "Title", "Editor, author"])];
    let progress = Progress::bar(article_links.len() as u64, "What's new");
    for link in article_links {
        progress.inc(1);
        let Ok(body) = client.get_text(&link).await else {
            continue;
        };
        let doc = Html::parse_document(&body);
        let title = text_of(find_tag(doc.root_element(), "h1")?);
        let editors = text_of(find_tag(doc.root_element(), "dl")?).replace('\n', " ");
        results.push(vec![link.to_string(), title, editors]);
    }
    progress.finish();
    Ok(Some(results))
}

/// Documentation links and status per Python version, from the sidebar
/// "All versions" list of the docs front page.
pub async fn latest_versions(client: &CachedClient) -> Result<Option<Rows>> {
    let doc_url = Url::parse(MAIN_DOC_URL)?;
    let Ok(body) = client.get_text(&doc_url).await else {
        return Ok(None);
    };
    let doc = Html::parse_document(&body);
    let sidebar = find_tag(doc.root_element(), "div.sphinxsidebarwrapper")?;

    let mut version_anchors = None;
    for list in find_all(sidebar, "ul")? {
        if text_of(list).contains("All versions") {
            version_anchors = Some(find_all(list, "a")?);
            break;
        }
    }
    let Some(version_anchors) = version_anchors else {
        let wanted = "ul containing \"All versions\"";
        error!("no tag matched selector `{wanted}`");
        return Err(Error::TagNotFound(wanted.into()));
    };

    let pattern = Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)")
        .expect("version pattern is well formed");
    let mut results = vec![header(&["Documentation link", "Version", "Status"])];
    for anchor in version_anchors {
        let link = require_attr(anchor, "href")?.to_string();
        let text = text_of(anchor);
        let (version, status) = match pattern.captures(&text) {
            Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
            None => (text.clone(), String::new()),
        };
        results.push(vec![link, version, status]);
    }
    Ok(Some(results))
}

/// Download the current pdf-a4 documentation archive into the downloads
/// directory.
pub async fn download(client: &CachedClient) -> Result<Option<Rows>> {
    let downloads_url = Url::parse(MAIN_DOC_URL)?.join("download.html")?;
    let Ok(body) = client.get_text(&downloads_url).await else {
        return Ok(None);
    };

    let archive_url;
    let filename;
    {
        let doc = Html::parse_document(&body);
        let main_div = find_tag(doc.root_element(), r#"div[role="main"]"#)?;
        let table = find_tag(main_div, "table.docutils")?;
        let anchor = find_tag(table, r#"a[href$="pdf-a4.zip"]"#)?;
        let href = require_attr(anchor, "href")?;
        archive_url = downloads_url.join(href)?;
        filename = href.rsplit('/').next().unwrap_or(href).to_string();
    }

    let archive = client.get_bytes(&archive_url).await?;
    fs::create_dir_all(DOWNLOADS_DIR).await?;
    let path = Path::new(DOWNLOADS_DIR).join(&filename);
    fs::write(&path, archive).await?;
    info!("archive saved to {}", path.display());
    Ok(None)
}

/// Reconcile card statuses against page statuses across the whole PEP index
/// and report a per-status tally.
pub async fn pep(client: &CachedClient) -> Result<Option<Rows>> {
    let pep_url = Url::parse(PEP_URL)?;
    let Ok(body) = client.get_text(&pep_url).await else {
        return Ok(None);
    };

    let (vocabulary, entries) = {
        let doc = Html::parse_document(&body);
        let vocabulary = StatusVocabulary::from_index(&doc)?;
        let entries = index_entries(&doc, &pep_url)?;
        (vocabulary, entries)
    };

    let progress = Progress::bar(entries.len() as u64, "PEP status");
    let outcome = reconcile(
        &entries,
        &vocabulary,
        |link| async move { client.get_text(&link).await },
        &progress,
    )
    .await?;

    if !outcome.mismatches.is_empty() {
        let mut block = String::from("Mismatched statuses:\n");
        for mismatch in &outcome.mismatches {
            block.push_str(&format!(
                "{}\nStatus on card: {}\nStatus on page: {}\n",
                mismatch.link, mismatch.declared, mismatch.authoritative
            ));
        }
        info!("{block}");
    }

    let mut results = vec![header(&["Status", "Count"])];
    results.extend(
        outcome
            .tally
            .iter()
            .map(|(status, count)| vec![status.to_string(), count.to_string()]),
    );
    results.push(vec!["Total".to_string(), outcome.total.to_string()]);
    Ok(Some(results))
}
