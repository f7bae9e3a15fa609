pub mod benefisient;
pub mod beregning;
pub mod bruker;
pub mod calculator;
pub mod common;
pub mod dokument;
pub mod enhet;
pub mod hendelse;
pub mod prosjekt;
pub mod ramme;
pub mod report;
pub mod sak;
pub mod selskap;
pub mod tilbud;
