pub mod concurrency;
pub mod error;
pub mod io;
pub mod sparse;

pub mod prelude {
    pub use super::concurrency::{configure_global_thread_pool, determine_allowed_cpus};
    pub use super::error::{is_broken_pipe, ChromcatError, Result};
    pub use super::io::{fragment_reader, fragment_writer, is_bgzipped, make_parent_dirs};
    pub use super::sparse::{density_stats, from_triplets_f32};
}
