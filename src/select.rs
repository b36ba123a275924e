pub(crate) mod sweeps;
