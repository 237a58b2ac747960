// Caltech — split-indexed image classification dataset
//
// Loads the Caltech directory layout, where every image lives under a
// class-named subdirectory and a per-split text file lists the images
// belonging to the split, one root-relative path per line:
//
//   faces/image_0001.jpg
//   BACKGROUND_Google/image_0002.jpg
//   dolphin/image_0003.jpg
//
// The first path segment is the class label. Lines whose label starts with
// "BACKGROUND" are skipped entirely. Labels get dense integer ids in
// first-seen order, and every qualifying image is decoded up front, so the
// whole split is resident in memory once construction returns.
//
// USAGE:
//
//   let ds = Caltech::new("data/caltech", "train")?;
//   println!("{} images, {} classes", ds.len(), ds.num_classes());
//   if let Some(item) = ds.get(0) {
//       // item.image: RgbImage, item.label: usize
//   }

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::dataset::Dataset;
use crate::error::{CaltechError, Result};
use crate::transform::{LabelTransform, Transform};
use crate::vocab::LabelVocabulary;

/// Reserved label prefix marking non-object background images. Index lines
/// carrying it produce neither an entry nor a vocabulary id.
const BACKGROUND_PREFIX: &str = "BACKGROUND";

/// Fixed directory holding the `<split>.txt` index files, resolved against
/// the working directory.
const INDEX_DIR: &str = "Caltech";

// Split

/// Which partition of the dataset to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// Parse a split name. Anything other than `"train"`/`"test"` is
    /// unrecognized.
    pub fn parse(name: &str) -> Option<Split> {
        match name {
            "train" => Some(Split::Train),
            "test" => Some(Split::Test),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }

    /// Name of the index file listing this split's images.
    pub fn index_file(self) -> String {
        format!("{}.txt", self.as_str())
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// DecodeMode

/// When image bytes are decoded.
///
/// `Eager` decodes the whole split during construction and holds it in
/// memory. `Lazy` keeps only paths and decodes on each access, trading
/// per-access latency for resident memory; on the lazy read path a decode
/// failure surfaces as `None` from [`Caltech::get`] instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    #[default]
    Eager,
    Lazy,
}

/// One sample: a decoded 3-channel image and its dense class id.
#[derive(Debug, Clone)]
pub struct CaltechItem {
    pub image: RgbImage,
    pub label: usize,
}

// CaltechBuilder

/// Builder for [`Caltech`].
pub struct CaltechBuilder {
    root: PathBuf,
    split: String,
    index_dir: PathBuf,
    decode: DecodeMode,
    transform: Option<Box<dyn Transform>>,
    target_transform: Option<Box<dyn LabelTransform>>,
    apply_target_transform: bool,
}

impl CaltechBuilder {
    /// Create a builder for the dataset rooted at `root`, split `"train"`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        CaltechBuilder {
            root: root.as_ref().to_path_buf(),
            split: "train".to_string(),
            index_dir: PathBuf::from(INDEX_DIR),
            decode: DecodeMode::Eager,
            transform: None,
            target_transform: None,
            apply_target_transform: false,
        }
    }

    /// Select the split by name (`"train"` or `"test"`).
    ///
    /// An unrecognized name does not fail the build: it is reported through
    /// a warning and yields a valid empty dataset. Callers detect the
    /// condition via `len() == 0`.
    pub fn split(mut self, split: &str) -> Self {
        self.split = split.to_string();
        self
    }

    /// Image hook applied on every [`Caltech::get`].
    pub fn transform<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Label hook. Accepted for interface compatibility with the image
    /// hook, but inert unless [`apply_target_transform`] opts in: by
    /// default labels come back as the raw vocabulary ids.
    ///
    /// [`apply_target_transform`]: Self::apply_target_transform
    pub fn target_transform<T: LabelTransform + 'static>(mut self, transform: T) -> Self {
        self.target_transform = Some(Box::new(transform));
        self
    }

    /// Opt in to running the label hook on every access.
    pub fn apply_target_transform(mut self, yes: bool) -> Self {
        self.apply_target_transform = yes;
        self
    }

    /// Directory containing the `<split>.txt` index files.
    ///
    /// Defaults to the fixed `Caltech/` subdirectory of the working
    /// directory; override for tests or nonstandard trees.
    pub fn index_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.index_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Decode eagerly at build time (default) or lazily on access.
    pub fn decode(mut self, mode: DecodeMode) -> Self {
        self.decode = mode;
        self
    }

    /// Read the index file and materialize the dataset.
    pub fn build(self) -> Result<Caltech> {
        let CaltechBuilder {
            root,
            split,
            index_dir,
            decode,
            transform,
            target_transform,
            apply_target_transform,
        } = self;

        let (split, labels, entries) = match Split::parse(&split) {
            Some(split) => {
                let index_path = index_dir.join(split.index_file());
                let content =
                    fs::read_to_string(&index_path).map_err(|source| CaltechError::IndexFile {
                        path: index_path.clone(),
                        source,
                    })?;
                let (labels, entries) = load_entries(&root, &content, decode)?;
                (Some(split), labels, entries)
            }
            None => {
                log::warn!("split '{split}' is not one of train/test; yielding an empty dataset");
                (None, LabelVocabulary::new(), Entries::Decoded(Vec::new()))
            }
        };

        log::info!("{} labels, {} entries loaded", labels.len(), entries.len());

        Ok(Caltech {
            split,
            labels,
            entries,
            transform,
            target_transform,
            apply_target_transform,
        })
    }
}

// Caltech dataset

/// One split of a Caltech-style dataset, indexable in memory.
pub struct Caltech {
    split: Option<Split>,
    labels: LabelVocabulary,
    entries: Entries,
    transform: Option<Box<dyn Transform>>,
    target_transform: Option<Box<dyn LabelTransform>>,
    apply_target_transform: bool,
}

impl std::fmt::Debug for Caltech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Caltech")
            .field("split", &self.split)
            .field("labels", &self.labels)
            .field("entries", &self.entries)
            .field("apply_target_transform", &self.apply_target_transform)
            .finish()
    }
}

/// Backing storage for the samples of one split.
#[derive(Debug)]
enum Entries {
    /// Eager mode: every image already decoded.
    Decoded(Vec<(RgbImage, usize)>),
    /// Lazy mode: resolved paths, decoded on each access.
    Paths(Vec<(PathBuf, usize)>),
}

impl Entries {
    fn len(&self) -> usize {
        match self {
            Entries::Decoded(v) => v.len(),
            Entries::Paths(v) => v.len(),
        }
    }
}

impl Caltech {
    /// Builder entry point.
    pub fn builder<P: AsRef<Path>>(root: P) -> CaltechBuilder {
        CaltechBuilder::new(root)
    }

    /// Load `split` (`"train"` or `"test"`) of the dataset rooted at
    /// `root`, with no transforms.
    pub fn new<P: AsRef<Path>>(root: P, split: &str) -> Result<Caltech> {
        CaltechBuilder::new(root).split(split).build()
    }

    /// Load a split through the typed enum, bypassing name parsing.
    pub fn load<P: AsRef<Path>>(root: P, split: Split) -> Result<Caltech> {
        CaltechBuilder::new(root).split(split.as_str()).build()
    }

    /// Number of samples in the split, after background filtering.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// The label vocabulary discovered while reading the index file.
    pub fn labels(&self) -> &LabelVocabulary {
        &self.labels
    }

    /// Number of distinct (non-background) classes.
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// The split this dataset was built from, or `None` when construction
    /// was given an unrecognized split name.
    pub fn split(&self) -> Option<Split> {
        self.split
    }

    /// Retrieve the sample at `index`.
    ///
    /// Out-of-range indices are reported through a warning and return
    /// `None`; they never panic. The image hook (if any) runs on every hit;
    /// the label hook only runs when the builder opted in.
    pub fn get(&self, index: usize) -> Option<CaltechItem> {
        if index >= self.entries.len() {
            log::warn!(
                "index {index} out of range for dataset with {} entries",
                self.entries.len()
            );
            return None;
        }
        let (image, label) = match &self.entries {
            Entries::Decoded(v) => {
                let (image, label) = &v[index];
                (image.clone(), *label)
            }
            Entries::Paths(v) => {
                let (path, label) = &v[index];
                match decode_rgb(path) {
                    Ok(image) => (image, *label),
                    Err(err) => {
                        log::warn!("{err}");
                        return None;
                    }
                }
            }
        };
        let image = match &self.transform {
            Some(t) => t.apply(image),
            None => image,
        };
        let label = match &self.target_transform {
            Some(t) if self.apply_target_transform => t.apply(label),
            _ => label,
        };
        Some(CaltechItem { image, label })
    }
}

impl Dataset for Caltech {
    type Item = CaltechItem;

    fn len(&self) -> usize {
        Caltech::len(self)
    }

    fn get(&self, index: usize) -> Option<CaltechItem> {
        Caltech::get(self, index)
    }

    fn name(&self) -> &str {
        match self.split {
            Some(Split::Train) => "caltech-train",
            Some(Split::Test) => "caltech-test",
            None => "caltech-empty",
        }
    }
}

// Index parsing

/// One pass over the index file content: derive labels, filter background
/// lines, register vocabulary ids, and collect (or decode) the entries.
fn load_entries(root: &Path, content: &str, mode: DecodeMode) -> Result<(LabelVocabulary, Entries)> {
    let mut labels = LabelVocabulary::new();
    let mut decoded: Vec<(RgbImage, usize)> = Vec::new();
    let mut paths: Vec<(PathBuf, usize)> = Vec::new();

    for line in content.lines() {
        // A line with no separator is itself the label.
        let label = match line.split_once('/') {
            Some((first, _)) => first,
            None => line,
        };
        if label.starts_with(BACKGROUND_PREFIX) {
            continue;
        }
        let id = labels.get_or_insert(label);
        let path = root.join(line);
        match mode {
            DecodeMode::Eager => decoded.push((decode_rgb(&path)?, id)),
            DecodeMode::Lazy => paths.push((path, id)),
        }
    }

    let entries = match mode {
        DecodeMode::Eager => Entries::Decoded(decoded),
        DecodeMode::Lazy => Entries::Paths(paths),
    };
    Ok((labels, entries))
}

/// Decode the image at `path`, forcing a 3-channel representation.
fn decode_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|source| CaltechError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

// Tests
