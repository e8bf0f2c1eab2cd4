pub mod clock;
pub mod config;
pub mod controller;
pub mod latch;
pub mod phase;
pub mod report;
pub mod sample;
pub mod stats;
pub mod worker;
