use std::fmt::Debug;
use tracing::error;

mod schema;
pub mod pg;
#[cfg(test)]
pub mod memory;

pub use pg::BookPgStore;

pub(crate) fn logging_with_default_vec<E, R>(e: E) -> Vec<R>
where
    E: Debug
{
    error!("{:?}", e);
    vec![]
}
