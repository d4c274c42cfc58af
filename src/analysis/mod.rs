pub mod engine;
pub mod match_record;
pub mod report;
pub mod stat_bucket;
