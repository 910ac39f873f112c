//! Filter a wine-quality dataset by quality score and render histograms of
//! selected features, served over HTTP.

pub mod app;
pub mod artifact;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod render;
pub mod state;
