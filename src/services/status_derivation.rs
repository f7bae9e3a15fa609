//! Project status derived from the statuses of its tilbud
//!
//! The winning tilbud is the one with the highest precedence. A project that
//! already has a produced tilbud and gets a new active one is expanding
//! (`Utvides`).

use crate::entities::prosjekt::ProsjektStatus;
use crate::entities::tilbud::TilbudStatus;

/// Applied when the derivation itself cannot be completed
pub const FALLBACK_STATUS: ProsjektStatus = ProsjektStatus::Behandles;

pub fn derive_prosjekt_status(statuses: &[TilbudStatus]) -> ProsjektStatus {
    let Some(winner) = statuses.iter().max_by_key(|s| s.precedence()) else {
        return ProsjektStatus::Ny;
    };

    let has_produced = statuses.contains(&TilbudStatus::Produsert);
    let has_active = statuses.iter().any(|s| s.is_active());
    if has_produced && has_active {
        return ProsjektStatus::Utvides;
    }

    map_tilbud_status(*winner)
}

/// Fixed mapping from a winning tilbud status to the project status
pub fn map_tilbud_status(status: TilbudStatus) -> ProsjektStatus {
    match status {
        TilbudStatus::Produsert => ProsjektStatus::Produsert,
        TilbudStatus::Godkjent => ProsjektStatus::KlarTilProduksjon,
        TilbudStatus::UnderUWBehandling => ProsjektStatus::AvventerGodkjenningUW,
        TilbudStatus::TilBehandling => ProsjektStatus::Behandles,
        TilbudStatus::Utkast => ProsjektStatus::Tildelt,
        TilbudStatus::Avslatt | TilbudStatus::Utlopt => ProsjektStatus::Avslaatt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_no_tilbud_is_ny() {
        assert_eq!(derive_prosjekt_status(&[]), ProsjektStatus::Ny);
    }

    #[test]
    fn test_single_status_mapping() {
        let cases = [
            (TilbudStatus::Utkast, ProsjektStatus::Tildelt),
            (TilbudStatus::TilBehandling, ProsjektStatus::Behandles),
            (TilbudStatus::UnderUWBehandling, ProsjektStatus::AvventerGodkjenningUW),
            (TilbudStatus::Godkjent, ProsjektStatus::KlarTilProduksjon),
            (TilbudStatus::Produsert, ProsjektStatus::Produsert),
            (TilbudStatus::Avslatt, ProsjektStatus::Avslaatt),
            (TilbudStatus::Utlopt, ProsjektStatus::Avslaatt),
        ];
        for (tilbud, expected) in cases {
            assert_eq!(derive_prosjekt_status(&[tilbud]), expected, "{:?}", tilbud);
        }
    }

    #[test]
    fn test_highest_precedence_wins() {
        let statuses = [
            TilbudStatus::Avslatt,
            TilbudStatus::Utkast,
            TilbudStatus::UnderUWBehandling,
            TilbudStatus::TilBehandling,
        ];
        assert_eq!(
            derive_prosjekt_status(&statuses),
            ProsjektStatus::AvventerGodkjenningUW
        );
    }

    #[test]
    fn test_produced_with_rejected_stays_produced() {
        let statuses = [TilbudStatus::Produsert, TilbudStatus::Avslatt, TilbudStatus::Utlopt];
        assert_eq!(derive_prosjekt_status(&statuses), ProsjektStatus::Produsert);
    }

    #[test]
    fn test_produced_plus_any_active_is_utvides() {
        for status in TilbudStatus::iter().filter(|s| s.is_active()) {
            let statuses = [TilbudStatus::Produsert, status];
            assert_eq!(
                derive_prosjekt_status(&statuses),
                ProsjektStatus::Utvides,
                "Produsert + {:?}",
                status
            );
        }
    }

    #[test]
    fn test_every_pair_matches_precedence_table() {
        for a in TilbudStatus::iter() {
            for b in TilbudStatus::iter() {
                let derived = derive_prosjekt_status(&[a, b]);
                let produced = a == TilbudStatus::Produsert || b == TilbudStatus::Produsert;
                let active = a.is_active() || b.is_active();
                if produced && active {
                    assert_eq!(derived, ProsjektStatus::Utvides);
                } else {
                    let winner = if a.precedence() >= b.precedence() { a } else { b };
                    assert_eq!(derived, map_tilbud_status(winner), "{:?} + {:?}", a, b);
                }
            }
        }
    }
}
