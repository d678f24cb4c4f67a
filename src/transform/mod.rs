//! Tree transforms applied between parsing and HTML serialization

pub mod callout;
pub mod fence;
pub mod html;

pub use callout::{CalloutContainer, CalloutTransform, CalloutType};
pub use fence::FenceMetadataTransform;

use crate::config::MarkdownConfig;
use crate::mdast::Root;

/// A single in-place pass over a document tree.
///
/// Passes are total: every input tree has a defined result, so there is no
/// error channel.
pub trait Transform {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn apply(&self, root: &mut Root);
}

/// Ordered list of transforms run over each document
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform + Send + Sync>>,
}

impl Pipeline {
    /// A pipeline with no passes
    pub fn empty() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Build the pipeline from the `markdown` config section
    pub fn from_config(config: &MarkdownConfig) -> Self {
        let mut pipeline = Self::empty();
        if config.code_titles {
            pipeline = pipeline.with(FenceMetadataTransform);
        }
        if config.callouts {
            pipeline = pipeline.with(CalloutTransform);
        }
        pipeline
    }

    /// Append a pass
    pub fn with<T>(mut self, transform: T) -> Self
    where
        T: Transform + Send + Sync + 'static,
    {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn run(&self, root: &mut Root) {
        for transform in &self.transforms {
            tracing::trace!(transform = transform.name(), "applying transform");
            transform.apply(root);
        }
    }
}

impl Default for Pipeline {
    /// Fence metadata first, then callouts
    fn default() -> Self {
        Self::from_config(&MarkdownConfig::default())
    }
}
