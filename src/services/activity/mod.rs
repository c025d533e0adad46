pub mod activity_logger;

pub use activity_logger::ActivityLogger;
