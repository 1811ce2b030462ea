pub mod parser;
pub mod chart;
pub mod multiline;
pub mod quality;
pub mod keywords;
pub mod similarity;
pub mod temporal;
pub mod categories;
pub mod clustering;
pub mod heatmap;
pub mod signal;
pub mod dedup;
pub mod sources;
pub mod config;
pub mod report;
