pub mod bounds;
pub mod constants;
pub mod geo;
pub mod viewport;
