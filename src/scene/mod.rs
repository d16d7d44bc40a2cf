pub(crate) mod build;
pub(crate) mod escape;
pub(crate) mod model;
pub(crate) mod svg;
