//! Tabular extract/transform/report pipeline and histogram viewer.
//!
//! * [`report`] pulls rows from a [`source::RowSource`], derives and cleans
//!   them, writes a per-category summary and joins an external file.
//! * [`app`] shows a [`histogram::Histogram`] of one column in a window.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod histogram;
pub mod report;
pub mod source;
pub mod state;
pub mod ui;
