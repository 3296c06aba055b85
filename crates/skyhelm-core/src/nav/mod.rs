pub mod autopilot;
pub mod command;
pub mod pose;
