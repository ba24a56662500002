pub mod backup_exchange;
pub mod cities;
pub mod classes;
pub mod communities;
pub mod core;
pub mod grades;
pub mod schedule;
pub mod schools;
pub mod time_blocks;
