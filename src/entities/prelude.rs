//! `SeaORM` Entity prelude

pub use super::bruker::Entity as Bruker;
pub use super::garanti_dokument::Entity as GarantiDokument;
pub use super::garanti_sak::Entity as GarantiSak;
pub use super::garanti_sak_hendelse::Entity as GarantiSakHendelse;
pub use super::prosjekt::Entity as Prosjekt;
pub use super::selskap::Entity as Selskap;
pub use super::tilbud::Entity as Tilbud;
pub use super::tilbud_benefisient::Entity as TilbudBenefisient;
pub use super::tilbud_beregning::Entity as TilbudBeregning;
pub use super::tilbud_enhet::Entity as TilbudEnhet;
