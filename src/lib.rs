pub mod export;
pub mod model;
pub mod state;
pub mod stats;
