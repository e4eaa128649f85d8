//! Data model for flattened XML.
//!
//! The parser produces an owned [`XmlNode`] tree, the flattener turns it into
//! [`FlatRow`]s of [`Scalar`] values, and the normalizer aligns those rows
//! into a rectangular [`Table`].

mod node;
mod row;
mod scalar;
mod table;

pub use node::*;
pub use row::*;
pub use scalar::*;
pub use table::*;
