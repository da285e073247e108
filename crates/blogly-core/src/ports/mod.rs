//! Ports - trait definitions for the record store.
//! These are the "interfaces" that infrastructure must implement.

mod repository;

pub use repository::{
    BaseRepository, PostRepository, PostTagRepository, TagRepository, UserRepository,
};
