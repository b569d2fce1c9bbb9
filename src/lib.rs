//! TRAWL - fishing vessel registry and voyage ledger
//!
//! This library backs the damage-investigation platform: it bulk-loads
//! the national vessel census, serves filtered registry queries, keeps
//! the monthly voyage ledger with its sales and expense records, and
//! indexes the externally rendered track archive.

pub mod actions;
pub mod auctions;
pub mod auctions_repo;
pub mod census;
pub mod commands;
pub mod db;
pub mod expenses;
pub mod expenses_repo;
pub mod memos;
pub mod memos_repo;
pub mod private_sales;
pub mod private_sales_repo;
pub mod registry;
pub mod registry_repo;
pub mod schema;
pub mod track_archive;
pub mod track_points;
pub mod track_points_repo;
pub mod uploads;
pub mod vessel_files;
pub mod vessel_files_repo;
pub mod vessel_photos;
pub mod vessel_photos_repo;
pub mod voyages;
pub mod voyages_repo;
pub mod web;
