mod api_models;
pub mod db;
mod error;
mod extractors;
mod handlers;
pub mod resolution;
mod router;
#[cfg(test)]
mod test_support;

pub use router::router;
