//! End-to-end reconciliation over fixture pages, no network involved.

use std::collections::HashMap;
use std::io;

use pretty_assertions::assert_eq;
use scraper::Html;
use url::Url;

use docscrape::pep::{index_entries, reconcile, StatusVocabulary};
use docscrape::progress::Progress;
use docscrape::Error;

const INDEX: &str = r##"
<html><body>
  <section id="pep-status-key">
    <ul class="simple">
      <li><em>Active</em> - currently valid guidance</li>
      <li><em>Draft</em> - under discussion</li>
      <li><em>Final</em> - design complete</li>
    </ul>
  </section>
  <section id="numerical-index">
    <table>
      <tbody>
        <tr>
          <td><abbr title="Informational, Active">IA</abbr></td>
          <td><a href="pep-0001/">1</a></td>
        </tr>
        <tr>
          <td><abbr title="Standards Track, Draft">SD</abbr></td>
          <td><a href="pep-0002/">2</a></td>
        </tr>
        <tr>
          <td><abbr title="Process, Accepted">PA</abbr></td>
          <td><a href="pep-0003/">3</a></td>
        </tr>
        <tr>
          <td><abbr title="Standards Track, Final">SF</abbr></td>
          <td><a href="pep-0004/">4</a></td>
        </tr>
      </tbody>
    </table>
  </section>
</body></html>"##;

fn detail(status: &str) -> String {
    format!(
        r##"<html><body><section id="pep-content">
        <dl><dt>Author</dt><dd>Someone</dd>
        <dt>Status</dt><dd><abbr>{status}</abbr></dd></dl>
        </section></body></html>"##
    )
}

fn fixture_pages(base: &Url) -> HashMap<Url, String> {
    // pep-0004 is deliberately absent: its fetch fails.
    [
        ("pep-0001/", "Active"),
        ("pep-0002/", "Final"),
        ("pep-0003/", "Accepted"),
    ]
    .into_iter()
    .map(|(link, status)| (base.join(link).unwrap(), detail(status)))
    .collect()
}

#[tokio::test]
async fn full_index_reconciliation() {
    let base = Url::parse("https://peps.python.org/").unwrap();
    let (vocabulary, entries) = {
        let doc = Html::parse_document(INDEX);
        (
            StatusVocabulary::from_index(&doc).unwrap(),
            index_entries(&doc, &base).unwrap(),
        )
    };

    assert_eq!(
        vocabulary.iter().collect::<Vec<_>>(),
        vec!["Active", "Draft", "Final"]
    );
    assert_eq!(entries.len(), 4);

    let pages = fixture_pages(&base);
    let outcome = reconcile(
        &entries,
        &vocabulary,
        |link| {
            let page = pages.get(&link).cloned();
            async move {
                page.ok_or_else(|| {
                    Error::Io(io::Error::new(
                        io::ErrorKind::ConnectionRefused,
                        "unreachable",
                    ))
                })
            }
        },
        &Progress::hidden(),
    )
    .await
    .unwrap();

    // Every row visited, including the unreachable one.
    assert_eq!(outcome.total, 4);

    // pep-0001 Active and pep-0002 Final are tallied; pep-0003's "Accepted"
    // is outside the vocabulary; pep-0004 was unreachable.
    assert_eq!(outcome.tally.get("Active"), Some(1));
    assert_eq!(outcome.tally.get("Draft"), Some(0));
    assert_eq!(outcome.tally.get("Final"), Some(1));
    assert_eq!(outcome.tally.sum(), 2);

    // Only pep-0002 disagrees with its card; pep-0003 matches its card even
    // though the status is unknown, and the unreachable row is skipped.
    assert_eq!(outcome.mismatches.len(), 1);
    assert_eq!(
        outcome.mismatches[0].link.as_str(),
        "https://peps.python.org/pep-0002/"
    );
    assert_eq!(outcome.mismatches[0].declared, "Draft");
    assert_eq!(outcome.mismatches[0].authoritative, "Final");

    // Tally rows come out in legend order.
    let labels: Vec<_> = outcome.tally.iter().map(|(s, _)| s.to_string()).collect();
    assert_eq!(labels, vec!["Active", "Draft", "Final"]);
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let base = Url::parse("https://peps.python.org/").unwrap();
    let (vocabulary, entries) = {
        let doc = Html::parse_document(INDEX);
        (
            StatusVocabulary::from_index(&doc).unwrap(),
            index_entries(&doc, &base).unwrap(),
        )
    };
    let pages = fixture_pages(&base);

    let fetch = |link: Url| {
        let page = pages.get(&link).cloned();
        async move {
            page.ok_or_else(|| {
                Error::Io(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "unreachable",
                ))
            })
        }
    };

    let first = reconcile(&entries, &vocabulary, fetch, &Progress::hidden())
        .await
        .unwrap();
    let second = reconcile(&entries, &vocabulary, fetch, &Progress::hidden())
        .await
        .unwrap();
    assert_eq!(first, second);
}
