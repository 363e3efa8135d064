//! Core domain models and logic for ornament
//!
//! This crate contains:
//! - Order models (Order, OrderLineItem, CustomizationField, Money)
//! - Design naming models (DesignIdentifier, ParsedDesignParts)
//! - Name normalization shared by generation and matching
//! - Filename parser (design file name -> structured parts)

pub mod design;
pub mod error;
pub mod normalize;
pub mod order;
pub mod parser;

pub use design::{
    CenterChangePolicy, CenterType, DEFAULT_WORKFLOW_SKUS, DesignIdentifier, ParsedDesignParts,
    ProductFamily,
};
pub use error::{Error, Result};
pub use normalize::{normalize_for_filename, normalize_for_matching};
pub use order::{CustomizationField, Money, Order, OrderLineItem};
pub use parser::parse;
