pub mod frag2mtx;
pub mod fragments;

pub use frag2mtx::{run_frag2mtx, Frag2MtxArgs};
pub use fragments::{run_fragments, FragmentsArgs};
