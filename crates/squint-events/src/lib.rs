//! Diagnostic event channel for the squint AppImage inspection library.
//!
//! Format detection can observe recoverable oddities (most notably a file
//! that looks like a Type 1 AppImage but lacks its magic bytes). Those are
//! reported as [`Diagnostic`] values through an injectable [`DiagnosticSink`]
//! rather than written to a hardcoded stream, so embedders decide where they
//! go and tests can assert on them deterministically.

pub mod event;
pub mod sink;

pub use event::Diagnostic;
pub use sink::{ChannelSink, CollectorSink, DiagnosticSink, NullSink, TracingSink};
