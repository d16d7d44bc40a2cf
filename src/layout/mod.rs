pub(crate) mod engine;
pub(crate) mod paginate;
pub(crate) mod wrap;
