//! Plugin row CRUD, split by direction.

mod read;
mod write;
