//! Discovery and resolution
//!
//! Turns the shoebox listing into a lazy sequence of resolved resources.
//!
//! # Overview
//!
//! - `Discovery` - paginates the listing and feeds each page to the classifier
//! - `ItemClassifier` - dispatches each item on its `ItemKind`
//! - `ImageResolver` - object id to image URIs via URI templates
//! - `SocialPostResolver` - post id to a synthetic `#ig:` key
//! - `ResultSequence` - pull-based `Stream` of `Result<ResolvedResource>`

mod classifier;
mod image;
mod sequence;
mod social;

pub use classifier::{Discovery, ItemClassifier};
pub use image::{
    resolve_image_record, select_size, ImageResolver, ImageSkip, SelectedSize,
    SIZE_LABEL_PREFERENCE,
};
pub use sequence::{Emitter, ResultSequence};
pub use social::SocialPostResolver;
