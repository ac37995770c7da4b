// Python bindings module
// Each file contains the PyO3 classes or functions of one concern

pub mod config;
pub mod io;
pub mod mesh;
pub mod reconstruction;

pub use config::PyReconstructionConfig;
pub use mesh::PyMesh;
