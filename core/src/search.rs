//! Asynchronous search over a `Transport`.
//!
//! # Design
//! `BookSearch` is the seam the search controller depends on: one call, one
//! completion. `HttpBookSearch` implements it by running the transport and
//! the parse step on a freshly spawned thread, so the caller's thread never
//! blocks on the network. There is no cancellation and no caching.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crate::client::BooksClient;
use crate::error::SearchError;
use crate::http::{Transport, TransportError};
use crate::types::Book;

/// Outcome of a single search.
pub type SearchOutcome = Result<Vec<Book>, SearchError>;

/// Callback invoked exactly once with the outcome of a search.
pub type SearchCompletion = Box<dyn FnOnce(SearchOutcome) + Send + 'static>;

/// A remote catalog that can be searched asynchronously.
pub trait BookSearch {
    /// Start a search for `query` and report the outcome through `completion`.
    ///
    /// Implementations must call `completion` exactly once, on any thread.
    fn search(&self, query: &str, completion: SearchCompletion);
}

/// `BookSearch` backed by a `BooksClient` and a `Transport`.
pub struct HttpBookSearch<T> {
    client: BooksClient,
    transport: Arc<T>,
}

impl<T> HttpBookSearch<T>
where
    T: Transport,
{
    pub fn new(client: BooksClient, transport: T) -> Self {
        Self {
            client,
            transport: Arc::new(transport),
        }
    }

    pub fn client(&self) -> &BooksClient {
        &self.client
    }

    /// Build, execute, and parse a search on the current thread.
    pub fn fetch_books(&self, query: &str) -> SearchOutcome {
        fetch(&self.client, self.transport.as_ref(), query)
    }
}

impl<T> BookSearch for HttpBookSearch<T>
where
    T: Transport + Send + Sync + 'static,
{
    fn search(&self, query: &str, completion: SearchCompletion) {
        let client = self.client.clone();
        let transport = Arc::clone(&self.transport);
        let query = query.to_string();
        thread::spawn(move || {
            // A panicking transport must still complete, or the caller waits forever.
            let outcome = catch_unwind(AssertUnwindSafe(|| fetch(&client, transport.as_ref(), &query)))
                .unwrap_or_else(|_| Err(TransportError::new("search worker panicked").into()));
            if let Err(err) = &outcome {
                tracing::debug!(query = %query, error = %err, "search failed");
            }
            completion(outcome);
        });
    }
}

fn fetch<T: Transport + ?Sized>(client: &BooksClient, transport: &T, query: &str) -> SearchOutcome {
    let request = client.build_search(query)?;
    let response = transport.execute(request)?;
    client.parse_search(response)
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::http::{HttpRequest, HttpResponse, TransportError};

    const ONE_ITEM: &str =
        r#"{"items":[{"id":"abc","volumeInfo":{"title":"Go in Action","authors":["W. Kennedy"]}}]}"#;

    fn client() -> BooksClient {
        BooksClient::new("http://books.test/volumes")
    }

    fn respond_with(body: &'static str) -> impl Fn(HttpRequest) -> Result<HttpResponse, TransportError> {
        move |_| {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: body.to_string(),
            })
        }
    }

    #[test]
    fn fetch_books_passes_built_request_to_transport() {
        let search = HttpBookSearch::new(client(), |req: HttpRequest| -> Result<HttpResponse, TransportError> {
            assert_eq!(req.url, "http://books.test/volumes?q=golang");
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: ONE_ITEM.to_string(),
            })
        });
        let books = search.fetch_books("golang").unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Go in Action");
    }

    #[test]
    fn fetch_books_surfaces_transport_error_unchanged() {
        let search = HttpBookSearch::new(client(), |_: HttpRequest| -> Result<HttpResponse, TransportError> {
            Err(TransportError::new("The Internet connection appears to be offline."))
        });
        let err = search.fetch_books("golang").unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
        assert_eq!(err.to_string(), "The Internet connection appears to be offline.");
    }

    #[test]
    fn search_completes_on_another_thread() {
        let search = HttpBookSearch::new(client(), respond_with(ONE_ITEM));
        let caller = thread::current().id();
        let (tx, rx) = mpsc::channel();
        search.search(
            "golang",
            Box::new(move |outcome| {
                tx.send((thread::current().id(), outcome)).unwrap();
            }),
        );
        let (worker, outcome) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(worker, caller);
        assert_eq!(outcome.unwrap()[0].id, "abc");
    }

    #[test]
    fn search_reports_no_data_through_completion() {
        let search = HttpBookSearch::new(client(), respond_with(""));
        let (tx, rx) = mpsc::channel();
        search.search("golang", Box::new(move |outcome| tx.send(outcome).unwrap()));
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(outcome, Err(SearchError::NoData)));
    }

    #[test]
    fn panicking_transport_still_completes_with_an_error() {
        let search = HttpBookSearch::new(client(), |_: HttpRequest| -> Result<HttpResponse, TransportError> {
            panic!("socket layer blew up")
        });
        let (tx, rx) = mpsc::channel();
        search.search("golang", Box::new(move |outcome| tx.send(outcome).unwrap()));
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let err = outcome.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
        assert_eq!(err.to_string(), "search worker panicked");
    }

    #[test]
    fn controller_fails_instead_of_hanging_when_transport_panics() {
        use crate::controller::{SearchController, SearchPhase};

        let search = HttpBookSearch::new(client(), |_: HttpRequest| -> Result<HttpResponse, TransportError> {
            panic!("socket layer blew up")
        });
        let mut controller = SearchController::new(search);
        controller.set_query("golang");
        controller.submit_query();
        assert!(controller.wait_for_completion());
        assert_eq!(controller.state().phase, SearchPhase::Failed);
        assert_eq!(controller.in_flight(), 0);
    }
}
