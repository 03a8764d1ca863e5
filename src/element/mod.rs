pub(crate) mod container;
pub(crate) mod descriptor;
pub(crate) mod host;
pub(crate) mod item;
