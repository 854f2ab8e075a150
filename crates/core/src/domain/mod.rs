pub mod item;
pub mod scenario;
