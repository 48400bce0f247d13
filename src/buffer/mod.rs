pub(crate) mod convert;
pub(crate) mod output;
pub(crate) mod pixel;
