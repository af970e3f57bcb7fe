pub mod api;
pub mod id;
pub mod is_global;
pub mod renewal;
pub mod tracing;
pub mod validity;
pub mod value;
