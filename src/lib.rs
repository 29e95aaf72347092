// marley-service/src/lib.rs
pub mod models;
pub mod player;
pub mod routes;
pub mod utils;

#[cfg(test)]
mod tests;
