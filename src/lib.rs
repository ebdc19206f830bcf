//! Terminal choropleth of climate statistics over the districts of Bangladesh.

pub mod app;
pub mod braille;
pub mod climate;
pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod summary;
pub mod ui;
pub mod view;
