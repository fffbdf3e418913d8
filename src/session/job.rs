use crate::domain::{QueryError, SearchQuery};
use crate::pipeline::Pipeline;
use crate::scraper::Fetch;
use crate::session::{RunStatus, SessionStore};
use crate::table::Dataset;
use std::path::Path;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("your session expired, reload the page and try again")]
    UnknownSession,

    #[error("hold your horses, a search is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Start a scrape for `query` in the background and record its progress in
/// the session. Tables go to `<data_dir>/sessions/<session id>/`.
pub fn spawn_search<F>(
    store: &SessionStore,
    token: &str,
    query: SearchQuery,
    search_base_url: &str,
    data_dir: &Path,
    fetcher: F,
) -> Result<JoinHandle<()>, SearchError>
where
    F: Fetch + Clone + Send + 'static,
{
    let link = query.search_url(search_base_url)?;
    let nights = query.nights();

    let session_id = store
        .with(token, |ctx| {
            if ctx.status.is_running() {
                return Err(SearchError::AlreadyRunning);
            }
            ctx.begin_search(query, link.clone());
            Ok(ctx.id.clone())
        })
        .ok_or(SearchError::UnknownSession)??;

    let dir = data_dir.join("sessions").join(&session_id);
    let store = store.clone();
    let token = token.to_string();

    info!(session = %session_id, url = %link, "search started");

    Ok(thread::spawn(move || {
        let outcome = Pipeline::in_dir(fetcher, &dir).run(&link);

        let (status, dataset, notice) = match outcome {
            Ok(report) => {
                let enriched = report.enrichment.is_ok();
                match Dataset::load(&report.best_path(), nights) {
                    Ok(data) => (
                        RunStatus::Finished {
                            rows: data.records.len(),
                            enriched,
                        },
                        data,
                        (!enriched).then(|| {
                            "hotel pages could not be read, showing search results without map data".to_string()
                        }),
                    ),
                    Err(e) => {
                        warn!(session = %session_id, error = %e, "finished table could not be loaded");
                        (
                            RunStatus::Failed { reason: e.to_string() },
                            Dataset::empty(),
                            Some("no data available yet".to_string()),
                        )
                    }
                }
            }
            Err(e) => {
                error!(session = %session_id, error = %e, "search failed");
                (
                    RunStatus::Failed { reason: e.to_string() },
                    Dataset::empty(),
                    None,
                )
            }
        };

        info!(session = %session_id, status = ?status, "search finished");
        store.with(&token, |ctx| {
            ctx.status = status;
            ctx.dataset = dataset;
            ctx.notice = notice;
        });
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::{Page, ScraperError};
    use crate::table::ENRICHED_FILE;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use tempfile::tempdir;

    const BASE: &str = "https://www.booking.com/searchresults.pl.html";

    #[derive(Clone)]
    struct FakeSite(HashMap<String, String>);

    impl Fetch for FakeSite {
        fn fetch(&self, url: &str) -> Result<Page, ScraperError> {
            self.0
                .get(url)
                .map(|body| Page {
                    url: url.to_string(),
                    body: body.clone(),
                })
                .ok_or(ScraperError::UnexpectedStatus {
                    status: 500,
                    url: url.to_string(),
                })
        }
    }

    fn query() -> SearchQuery {
        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        SearchQuery::new("Kraków", d("2025-03-01"), d("2025-03-03"), 2).unwrap()
    }

    #[test]
    fn finished_search_loads_the_session_table() {
        let link = query().search_url(BASE).unwrap();
        let mut site = HashMap::new();
        site.insert(
            link,
            r#"<div data-testid="property-card">
                 <a data-testid="title-link" href="/hotel/a.html"><div data-testid="title">A</div></a>
                 <span data-testid="price-and-discounted-price">400 zł</span>
               </div>"#
                .to_string(),
        );

        let store = SessionStore::new(Dataset::empty(), None);
        let token = store.create();
        let tmp = tempdir().unwrap();
        let dir = tmp.path();

        spawn_search(&store, &token, query(), BASE, dir, FakeSite(site))
            .unwrap()
            .join()
            .unwrap();

        let ctx = store.snapshot(&token).unwrap();
        assert_eq!(
            ctx.status,
            RunStatus::Finished {
                rows: 1,
                enriched: true
            }
        );
        assert_eq!(ctx.dataset.nights, 2);
        assert_eq!(ctx.dataset.records[0].price, Some(400.0));
        assert!(dir.join("sessions").join(&ctx.id).join(ENRICHED_FILE).exists());
    }

    #[test]
    fn unreachable_site_marks_the_run_failed() {
        let store = SessionStore::new(Dataset::empty(), None);
        let token = store.create();
        let tmp = tempdir().unwrap();
        let dir = tmp.path();

        spawn_search(&store, &token, query(), BASE, dir, FakeSite(HashMap::new()))
            .unwrap()
            .join()
            .unwrap();

        let ctx = store.snapshot(&token).unwrap();
        assert!(matches!(ctx.status, RunStatus::Failed { .. }));
        assert!(ctx.dataset.is_empty());
    }

    #[test]
    fn second_search_while_running_is_rejected() {
        let store = SessionStore::new(Dataset::empty(), None);
        let token = store.create();
        store.with(&token, |ctx| ctx.begin_search(query(), "x".into()));

        let err = spawn_search(&store, &token, query(), BASE, tempdir().unwrap().path(), FakeSite(HashMap::new()))
            .unwrap_err();
        assert!(matches!(err, SearchError::AlreadyRunning));
    }

    #[test]
    fn unknown_session_is_rejected() {
        let store = SessionStore::new(Dataset::empty(), None);
        let err = spawn_search(&store, "nope", query(), BASE, tempdir().unwrap().path(), FakeSite(HashMap::new()))
            .unwrap_err();
        assert!(matches!(err, SearchError::UnknownSession));
    }
}
