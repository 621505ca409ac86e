//! Flat-file record keeping for bolt-torquing inspections.
//!
//! The backing file is a plain CSV acting as a pseudo-database. A
//! [`store::RecordStore`] loads it with synonym-tolerant header detection
//! and appends new inspection rows; saves rewrite the file in full and can
//! mirror each save into stamped backup snapshots. On top of the store,
//! [`options`] derives the distinct, naturally-ordered choice lists that
//! drive entry dropdowns, and [`export`] gates a zipped (optionally
//! passphrase-locked) snapshot behind a shared secret.

pub mod config;
pub mod export;
pub mod options;
pub mod record;
pub mod schema;
pub mod sort;
pub mod store;
