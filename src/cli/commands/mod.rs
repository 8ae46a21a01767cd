pub mod architecture;
pub mod config;
pub mod diagram;
pub mod functions;
pub mod languages;
pub mod report;
pub mod scan;
pub mod search;
pub mod summarize;
pub mod tree;
