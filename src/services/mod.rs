//! Planning services

pub mod network;
pub mod reconstruct;
pub mod report;
pub mod routing;
pub mod splitter;
pub mod sweep;
pub mod vrp;
pub mod windows;
