pub(crate) mod builder;
pub(crate) mod indexed;
pub(crate) mod palette;
