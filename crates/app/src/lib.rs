//! Cart domain, persistence and service layer shared by the Cartwheel binaries.

pub mod context;
pub mod database;
pub mod domain;
pub mod uuids;

#[cfg(test)]
mod test;
