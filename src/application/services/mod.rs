pub mod call_scheduler;
pub mod jwt;
pub mod voice;
