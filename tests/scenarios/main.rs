//! Scenario-based tests for text-pipeline

mod helpers;

mod custom_scripts;
mod failure_handling;
mod persistence_roundtrip;
mod processor_store;
mod text_chain;
