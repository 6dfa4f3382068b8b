// Library for tests to access modules

pub mod cache;
pub mod config;
pub mod docker_repo;
pub mod metadata_repo;
pub mod models;
pub mod normalize;
pub mod refresher;
pub mod resolve;
pub mod routes;
pub mod sources;
pub mod version;
