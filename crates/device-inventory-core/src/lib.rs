//! # Device Inventory Core
//!
//! Device record model and attribute merge semantics for the device inventory.
//!
//! This crate provides:
//! - Dynamically typed attribute values with order-sensitive equality
//! - Attributes, partial attribute updates, and device records
//! - Field paths addressing a device document
//! - The merge engine turning partial updates into field-level write plans

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod device;
pub mod merge;
pub mod path;
pub mod value;

pub use attribute::{Attribute, DeviceAttributes, IncomingAttributes, PartialAttribute};
pub use device::{Device, DeviceId};
pub use merge::{merge, AttributeField, FieldUpdate, FieldWrite, UpdatePlan};
pub use path::FieldPath;
pub use value::{Value, ValueError};
