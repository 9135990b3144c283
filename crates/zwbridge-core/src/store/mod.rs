// ── Registries shared between the loop thread and observers ──

mod collection;
mod registry;

pub use registry::Registry;
