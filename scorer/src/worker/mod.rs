pub mod output;
pub mod runner;
pub mod service;
pub mod status;
pub mod tracker;

pub use runner::JobRunner;
pub use service::ScoreService;
pub use tracker::JobTracker;
