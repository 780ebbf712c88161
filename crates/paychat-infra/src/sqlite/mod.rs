//! SQLite bootstrap.
//!
//! The database is only connected and verified at startup; nothing is read
//! or written yet.

pub mod pool;
