pub mod debate;
pub mod routes;
