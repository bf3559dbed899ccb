//! Terminal plotting for the one-shot CLI path.

mod ascii;

pub use ascii::render_ascii_plot;
