//! MedCompanion: guard-railed medication information service.
//!
//! A small HTTP service behind the MedCompanion site: an AI chat with
//! server-side safety guardrails, a scripted demo of the pill-recognition
//! flow, and a minimal session layer in front of both.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod context;
pub mod engine;
pub mod guardrails;
pub mod llm;
pub mod remote;
