// NetBox inventory export: REST object shapes and local query filters.

pub mod export;
pub mod models;
