pub mod anamnesis;
mod client;
mod photo;

pub use anamnesis::{AnamnesisRecord, FieldKind, StorageValue, ANAMNESIS_FIELDS};
pub use client::{ClientFields, ClientView, CLIENT_FIELDS};
pub use photo::{NewPhoto, PhotoContent, PhotoSummary};
