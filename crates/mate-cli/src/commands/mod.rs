pub mod cleanup;
pub mod clear;
pub mod common;
pub mod completions;
pub mod editor;
pub mod export;
pub mod note;
pub mod prompt;
pub mod settings;
pub mod sync;
