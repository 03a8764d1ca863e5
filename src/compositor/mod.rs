pub(crate) mod cache;
pub(crate) mod overlay;
pub(crate) mod painter;
pub(crate) mod raster;
pub(crate) mod registry;
