//! Text renderings of the search and favorites screens.
//!
//! Both functions are pure: they take controller state and return the text
//! to print. Result rows are numbered from 1 so `--save N` can refer to them;
//! favorites show their store key so `favorites remove <key>` can.

use std::fmt::Write;

use bookshelf_core::{Book, FavoriteRecord, SearchPhase, SearchState};

pub fn render_search_screen(state: &SearchState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Search: {}", state.query);

    match state.phase {
        SearchPhase::Idle => {
            let _ = writeln!(out, "Type a query to search.");
        }
        SearchPhase::Loading => {
            let _ = writeln!(out, "Loading...");
        }
        SearchPhase::Failed => {
            let message = state.error_message.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "Error: {message}");
        }
        SearchPhase::Loaded if state.books.is_empty() => {
            let _ = writeln!(out, "No results.");
        }
        SearchPhase::Loaded => {}
    }

    // A failed search keeps showing the previous results.
    for (i, book) in state.books.iter().enumerate() {
        write_book_row(&mut out, i + 1, book);
    }
    out
}

fn write_book_row(out: &mut String, number: usize, book: &Book) {
    let _ = writeln!(out, "{number:>3}. {}", book.title);
    let authors = if book.authors.is_empty() {
        "unknown author".to_string()
    } else {
        book.authors.join(", ")
    };
    let _ = writeln!(out, "     {authors} | {}", book.publisher);
    if let Some(description) = &book.description {
        let _ = writeln!(out, "     {}", excerpt(description, 72));
    }
}

pub fn render_favorites_screen(favorites: &[FavoriteRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Favorites ({})", favorites.len());
    if favorites.is_empty() {
        let _ = writeln!(out, "No favorites yet.");
        return out;
    }
    for record in favorites {
        let _ = writeln!(out, "[{}] {}", record.key, record.title);
        let _ = writeln!(out, "     {} | {}", record.authors, record.publisher);
    }
    out
}

/// First `max` characters of `text` on one line, with an ellipsis if cut.
fn excerpt(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}
