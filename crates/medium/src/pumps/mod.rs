pub(crate) mod poll;
pub(crate) mod recv;
