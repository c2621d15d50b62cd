pub(super) mod inst;
