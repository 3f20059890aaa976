//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate registry, schedule and persistence into use-case APIs.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod planner;
