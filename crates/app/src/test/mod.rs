//! Shared infrastructure for database-backed tests.


pub(crate) use context::TestContext;
