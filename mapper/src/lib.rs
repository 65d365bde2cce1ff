pub use map::{record_to_structure, structure_to_record, table_to_records};
pub use structure::{MemoryStructure, Structure, StructureError};

mod map;
mod structure;
