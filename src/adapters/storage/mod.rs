//! Local artifact storage
//!
//! Row files in CSV (`csv` crate) or JSON Lines (`serde_json`), written
//! atomically through `tempfile`.

pub mod combined;
pub mod format;
pub mod layout;
pub mod writer;

pub use combined::CombinedArtifact;
pub use format::ArtifactFormat;
pub use layout::{ArtifactLayout, OutputArtifact};
pub use writer::{read_table, write_table, AtomicArtifact, RowWriter};
