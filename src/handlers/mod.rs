//! Typed handlers behind the IPC channels, grouped by channel prefix

pub mod bruker;
pub mod dokument;
pub mod garanti;
pub mod kalkulator;
pub mod rapport;
pub mod tilbud;
