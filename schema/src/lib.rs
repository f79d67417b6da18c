// Elemental battle schema - shared type definitions
// Enums and records that cross the engine boundary: catalog entries,
// persisted card templates and the element triangle itself.

pub use card_data::*;
pub use element_types::*;
pub use move_types::*;

pub mod card_data;
pub mod element_types;
pub mod move_types;
