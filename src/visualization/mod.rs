pub mod camera;
pub mod raster;
pub mod export;
pub mod viewer;
