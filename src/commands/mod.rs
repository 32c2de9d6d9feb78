//! Command implementations for the rke2-genconfig CLI

pub mod generate;
