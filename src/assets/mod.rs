pub(crate) mod backgrounds;
pub(crate) mod decode;
pub(crate) mod fonts;
