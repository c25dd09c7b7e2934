use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("no images to lay out")]
    NoImages,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to process image {index} ({name}): {source}")]
    ImageProcessing {
        index: usize,
        name: String,
        source: image::ImageError,
    },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("document assembly failed: {0}")]
    Document(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SheetError>;

/// One uploaded image, in placement order. The name is only used for
/// diagnostics and progress labels.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}
