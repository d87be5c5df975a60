//! Developer tooling: store inspection and frame timing.
//!
//! # Invariants
//! - Tools only read the store; they never edit it.

mod inspector;
mod sampler;

pub use inspector::{BlockInfo, StoreInspector, StoreSummary};
pub use sampler::FrameSampler;

pub fn crate_info() -> &'static str {
    "blockworld-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
