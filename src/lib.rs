// Library for tests to access modules

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod history_repo;
pub mod logging;
pub mod models;
pub mod routes;
pub mod sensor;
pub mod version;
pub mod worker;
