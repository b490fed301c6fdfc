use std::path::PathBuf;
use thiserror::Error;

/// Invalid geometry handed to the pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    /// An index buffer entry points past the end of the vertex array.
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Failures while bringing resources into memory or writing them back out.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load texture '{path}': {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load OBJ '{path}': {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("OBJ '{0}' contains no geometry")]
    EmptyObj(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to save image to '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Errors raised while producing a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Data(#[from] DataError),

    /// Reported by a hardware backend implementation.
    #[error("hardware backend failed: {0}")]
    Backend(String),
}
