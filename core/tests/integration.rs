//! End-to-end tests against the live mock books API.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client, the
//! threaded search, and both controllers over real HTTP using ureq. Validates
//! that request building and response mapping work against the actual server
//! and that searched books round-trip through the favorites store.

use std::net::SocketAddr;

use bookshelf_core::{
    BooksClient, FavoritesController, FavoritesStore, HttpBookSearch, HttpMethod, HttpRequest,
    HttpResponse, RedbFavoritesStore, SearchController, SearchPhase, Transport, TransportError,
};

/// Execute an `HttpRequest` using ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = match req.method {
            HttpMethod::Get => self.agent.get(&req.url).call(),
        }
        .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: SocketAddr) -> BooksClient {
    BooksClient::new(&format!("http://{addr}/books/v1/volumes"))
}

#[test]
fn client_maps_live_response() {
    let addr = start_server();
    let client = client_for(addr);
    let transport = UreqTransport::new();

    let req = client.build_search("go action").unwrap();
    let books = client.parse_search(transport.execute(req).unwrap()).unwrap();

    assert_eq!(books.len(), 1);
    let book = &books[0];
    assert_eq!(book.id, "abc");
    assert_eq!(book.title, "Go in Action");
    assert_eq!(book.authors, vec!["W. Kennedy"]);
    assert_eq!(book.publisher, "Unknown");
    assert_eq!(book.cover_image_url, "");
    assert_eq!(book.description, None);
}

#[test]
fn search_and_favorite_lifecycle() {
    let addr = start_server();
    let search = HttpBookSearch::new(client_for(addr), UreqTransport::new());
    let mut searcher = SearchController::new(search);

    // Step 1: empty query never leaves Idle.
    searcher.submit_query();
    assert_eq!(searcher.state().phase, SearchPhase::Idle);

    // Step 2: search the catalog.
    searcher.set_query("programming language");
    searcher.submit_query();
    assert_eq!(searcher.state().phase, SearchPhase::Loading);
    assert!(searcher.wait_for_completion());
    assert_eq!(searcher.state().phase, SearchPhase::Loaded);
    let books = searcher.state().books.clone();
    assert_eq!(books.len(), 2);

    // Step 3: star the first result twice.
    let dir = tempfile::tempdir().unwrap();
    let store = RedbFavoritesStore::open(dir.path().join("favorites.redb")).unwrap();
    let mut favorites = FavoritesController::new(store);
    favorites.add(&books[0]);
    favorites.add(&books[0]);
    assert!(favorites.favorites().is_empty(), "add does not update the held list");

    // Step 4: refresh shows both records with flattened authors.
    favorites.refresh();
    assert_eq!(favorites.favorites().len(), 2);
    let record = favorites.favorites()[0].clone();
    assert_eq!(record.id, books[0].id);
    assert_eq!(record.title, books[0].title);
    assert_eq!(record.authors, books[0].authors.join(", "));
    assert_eq!(record.publisher, books[0].publisher);
    assert_eq!(record.cover_image_url, books[0].cover_image_url);
    assert_eq!(record.book_description, books[0].description);

    // Step 5: remove one; the other copy stays.
    favorites.remove(&record);
    assert_eq!(favorites.favorites().len(), 1);
    let stored = favorites.store().list().unwrap();
    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0].key, record.key);
}

#[test]
fn server_rejection_fails_search_and_keeps_results() {
    let addr = start_server();
    let search = HttpBookSearch::new(client_for(addr), UreqTransport::new());
    let mut searcher = SearchController::new(search);

    searcher.set_query("beowulf");
    searcher.submit_query();
    assert!(searcher.wait_for_completion());
    assert_eq!(searcher.state().books.len(), 1);

    // Whitespace passes the controller's empty check but the server wants terms.
    searcher.set_query("   ");
    searcher.submit_query();
    assert!(searcher.wait_for_completion());

    let state = searcher.state();
    assert_eq!(state.phase, SearchPhase::Failed);
    assert!(state.error_message.as_deref().unwrap().starts_with("HTTP 400"));
    assert_eq!(state.books.len(), 1);
    assert_eq!(state.books[0].title, "Beowulf");
}

#[test]
fn unreachable_server_fails_with_transport_message() {
    // Bind and immediately release a port so nothing is listening on it.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let transport = UreqTransport::new();
    let expected = transport
        .execute(client_for(addr).build_search("golang").unwrap())
        .unwrap_err();

    let mut searcher = SearchController::new(HttpBookSearch::new(client_for(addr), transport));
    searcher.set_query("golang");
    searcher.submit_query();
    assert!(searcher.wait_for_completion());

    let state = searcher.state();
    assert_eq!(state.phase, SearchPhase::Failed);
    assert_eq!(state.error_message.as_deref(), Some(expected.message()));
    assert!(state.books.is_empty());
}
