//! In-memory record store - used when no database is configured.

mod store;

pub use store::InMemoryStore;

#[cfg(test)]
mod tests;
