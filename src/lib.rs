//! A typed document model for OpenTrafficSim (OTS) XML scenario files.
//!
//! An [`OtsDocument`] holds the sections of an `Ots` file: definitions, the
//! road network, demand, behavioral models, scenarios and traffic control.
//! Every schema node is a plain struct or enum with public fields, and every
//! attribute value is typed: lengths carry their unit, bounded numbers are
//! checked, and values written as `{expression}` are kept as expressions.
//!
//! ```rust
//! use ots_schema::document::OtsDocument;
//! use ots_schema::types::Validate;
//!
//! let document = OtsDocument::from_reader(
//!     r#"<Ots><Network>
//!         <Node Id="A" Coordinate="(0, 0)"/>
//!         <Node Id="B" Coordinate="(100, 0)"/>
//!         <Link Id="AB" Type="FREEWAY" NodeStart="A" NodeEnd="B"><Straight/><RoadLayout/></Link>
//!     </Network></Ots>"#
//!         .as_bytes(),
//! )
//! .unwrap();
//! assert!(document.validate().is_valid());
//! ```

pub mod control;
pub mod definitions;
pub mod demand;
pub mod distributions;
pub mod document;
pub mod model;
pub mod network;
pub mod scenario;
pub mod types;
pub mod values;
pub mod xml;

mod validation_utils;

#[cfg(test)]
mod test_utils;

pub use crate::document::{OTS_NAMESPACE, OtsDocument};
pub use crate::types::{Validate, ValidationResult};
pub use crate::values::{ExprValue, Expression};
pub use crate::xml::{OtsError, WriteOptions};
