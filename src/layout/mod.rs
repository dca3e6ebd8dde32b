pub(crate) mod fit;
pub(crate) mod logos;
pub(crate) mod text;
