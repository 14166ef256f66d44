//! Completion client implementations for AZCC.
//!
//! All providers implement the `azcc_core::Provider` trait.

pub mod azure_openai;

pub use azure_openai::AzureOpenAiProvider;
