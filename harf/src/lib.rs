//! Turkish handwriting OCR service.
//!
//! An image goes to a remote vision model for transcription; the returned
//! text then runs through a two-stage correction pipeline (morphology-aware
//! spell correction, with a static substitution table as fallback).

pub mod api;
pub mod config;
pub mod correction;
pub mod error;
pub mod morphology;
pub mod ocr;
