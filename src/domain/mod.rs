//! Domain model: folios, customers, transaction correlation and the ports the
//! application layer depends on.

pub mod customer;
pub mod folio;
pub mod ports;
pub mod provider;
pub mod transaction;
