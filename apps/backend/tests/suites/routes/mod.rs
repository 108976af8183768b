pub mod error_shape;
pub mod games;
pub mod healthcheck;
