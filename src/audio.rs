//! Sound output backed by `rodio`.
//!
//! One output stream is opened for the lifetime of the program; every
//! `play` builds a fresh `Sink` positioned at the requested offset.

mod output;
mod sink;

pub use output::RodioOutput;

#[cfg(test)]
mod tests;
