//! FarmHelp backend: farmer records, public form intake, and the crop and sensor demos
//! shown on the landing page.

pub mod agronomy;
pub mod config;
pub mod error;
pub mod http;
pub mod integrations;
pub mod records;
pub mod sensors;
pub mod telemetry;
