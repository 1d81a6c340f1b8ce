pub mod authentication;
pub mod client;
pub mod configuration;
pub mod domain;
pub mod photo;
pub mod routes;
pub mod sheet;
pub mod startup;
pub mod telemetry;
pub mod utils;
