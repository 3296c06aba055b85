pub mod lighting;
pub mod present;
pub mod probe;
