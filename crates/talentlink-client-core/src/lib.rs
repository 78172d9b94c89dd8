//! Shared client-side domain logic for TalentLink front ends: auth input
//! normalization and transport traits, chat message normalization, and
//! profile/KYC validation. Platform-neutral; no browser types.

pub mod auth;
pub mod message;
pub mod profile;
