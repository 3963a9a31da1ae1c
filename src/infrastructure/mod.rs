pub mod repositories;
pub mod voice;
