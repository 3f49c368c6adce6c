use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("geometry {geometry} references material {material} but the scene has {count}")]
    MaterialOutOfRange {
        geometry: usize,
        material: u32,
        count: usize,
    },
    #[error("geometry {geometry} references mesh {mesh} but the scene has {count}")]
    MeshOutOfRange {
        geometry: usize,
        mesh: u32,
        count: usize,
    },
    #[error("mesh {mesh} has {indices} indices, expected a multiple of three")]
    MalformedMesh { mesh: usize, indices: usize },
    #[error("mesh {mesh} has {normals} normals for {positions} positions")]
    NormalCountMismatch {
        mesh: usize,
        normals: usize,
        positions: usize,
    },
    #[error("mesh {mesh} references vertex {index} but only has {count}")]
    VertexOutOfRange {
        mesh: usize,
        index: u32,
        count: usize,
    },
    #[error("geometry {geometry} has a singular transform")]
    SingularTransform { geometry: usize },
    #[error("pixel ({x}, {y}) is outside the {width}x{height} film")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
    #[error("no render has been launched")]
    NoRender,
    #[error("render thread panicked")]
    RenderPanicked,
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Settings(#[from] serde_yaml::Error),
    #[error("failed to write EXR: {0}")]
    Exr(#[from] exr::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
