//! Domain models for FASTCO.
//!
//! Every record embeds [`base::EntityMeta`] and implements
//! [`base::Entity`]. Variant families are closed enums tagged with `kind`;
//! relations between records are identifiers, resolved through the
//! repository layer.

pub mod account;
pub mod bank;
pub mod base;
pub mod credential;
pub mod document;
pub mod engagement;
pub mod legal_entity;
pub mod order;
pub mod product;
