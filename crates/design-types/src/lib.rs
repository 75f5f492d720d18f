pub mod chair;
pub mod design;
pub mod field;
pub mod material;
pub mod table;

pub use chair::*;
pub use design::*;
pub use field::*;
pub use material::*;
pub use table::*;
