// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    fetch_document, load_document_from_source, looks_like_url, read_document, render_document,
    write_output,
};
