pub(crate) mod pivot;
