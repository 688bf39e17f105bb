// Library root for the weekly chart tool.
// The binary in main.rs wires these modules together sequentially:
// config -> schema -> data -> chart.

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod schema;
