pub mod classifier;
pub mod detect;
