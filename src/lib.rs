//! Penaltybox - Per-Key Request Admission Control
//!
//! This crate decides, per caller key, whether to admit or reject the
//! current request, and escalates the penalty for repeat offenders along
//! a configurable ban delay schedule. It uses fixed-window counting with
//! progressive banning and persists its per-key state through a pluggable
//! storage adapter, so it can sit in front of any request pipeline.

pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
pub mod store;
