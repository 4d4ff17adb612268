//! Training-data export.
//!
//! Players record a state vector at each of their decision points. When the
//! game ends these become labelled samples: 1 for players who did not finish
//! last, 0 for the one who did. [`balanced_samples`] evens out the labels and
//! [`write_lines`] renders the plain-text format, one comma-separated sample
//! per line.

pub mod samples;

pub use samples::{balanced_samples, labelled_samples, write_lines, TrainingSample};
