//! File writers.

mod local_writer;
mod memory_writer;

pub(crate) use local_writer::map_io_error;
pub use local_writer::LocalWriter;
pub use memory_writer::MemoryWriter;
