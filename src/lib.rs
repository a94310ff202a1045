//! Agrichat - multilingual agricultural advisory chatbot
//!
//! Answers farmers' questions about crop diseases, treatments, prevention
//! and crops in French, Wolof and Pulaar, from a static knowledge catalog.

pub mod api;
pub mod config;
pub mod dialogue;
pub mod knowledge;
