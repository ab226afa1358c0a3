//! Choice of the two long plate edges from the extracted polygon.
//!
//! The choice is a policy: [`LongestTwoEdges`] reproduces the plain "two
//! longest sides" rule, while [`AspectAwareSelector`] also checks that the two
//! sides run along the plate's dominant axis and lie on opposite sides of it.
//! [`SelectorPolicy`] is the serde-configurable switch between them.

pub mod select;

pub use select::{AspectAwareSelector, EdgeSelector, LongestTwoEdges, SelectorPolicy};
