pub mod book;
pub mod configs;
pub mod shell;
pub mod store;

pub use book::{Book, BookRepository, NewBook, ReadState};
pub use store::{BookStore, StoreError};
