pub mod artifact;
pub mod call_id;
pub mod constant;
pub mod job;
pub mod params;
