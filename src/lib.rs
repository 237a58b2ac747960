//! # caltech101
//!
//! In-memory loader for Caltech-style image classification datasets:
//! images organized under class-named subdirectories, with one plain-text
//! index file per split listing the images that belong to it.
//!
//! This crate provides:
//! - [`Caltech`] — a split of the dataset, fully materialized in memory,
//!   with dense integer label ids assigned in first-seen order
//! - [`Dataset`] — indexed-access trait consumed by training harnesses
//! - [`LabelVocabulary`] — the ordered label-string → id map
//! - [`Transform`] / [`LabelTransform`] — hooks applied at access time,
//!   not at load time
//!
//! Index lines whose class label starts with `BACKGROUND` are excluded
//! from both the entries and the vocabulary.
//!
//! ```no_run
//! use caltech101::Caltech;
//!
//! let ds = Caltech::new("data/caltech", "train")?;
//! println!("{} images, {} classes", ds.len(), ds.num_classes());
//! # Ok::<(), caltech101::CaltechError>(())
//! ```

pub mod caltech;
pub mod dataset;
pub mod error;
pub mod transform;
pub mod vocab;

pub use caltech::{Caltech, CaltechBuilder, CaltechItem, DecodeMode, Split};
pub use dataset::{Dataset, DatasetIterator};
pub use error::{CaltechError, Result};
pub use transform::{Compose, LabelTransform, Resize, Transform};
pub use vocab::LabelVocabulary;
