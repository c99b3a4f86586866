//! Energy measurement and loudest-window search
//!
//! - Sample/accumulator types (exact integer or f64 accumulation)
//! - Sliding-window energy profile (O(n) incremental)
//! - Loudest-window selection with a minimum-volume gate

pub mod profile;
pub mod sample;
pub mod selector;

pub use profile::{compute_energy_profile, compute_frame_energy_profile, RESYNC_INTERVAL};
pub use sample::{Energy, EnergySample};
pub use selector::{find_peak, select_loudest_window, Selection};
