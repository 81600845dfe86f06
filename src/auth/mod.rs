pub mod authorization;
pub mod jwks;
pub mod jwt;
pub mod middleware;
