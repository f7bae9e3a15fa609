//! CSV export of customer and claims detail tables
//!
//! Header order is fixed, every field is quoted and embedded quotes are
//! doubled.

use csv::{QuoteStyle, WriterBuilder};

use crate::error::{ServiceError, ServiceResult};
use crate::models::report::{GarantiKundeRad, SkadeRad};

pub const KUNDE_HEADERS: [&str; 8] = [
    "Organisasjonsnummer",
    "Kunde",
    "Produkt",
    "Garantibeløp",
    "Premie",
    "Status",
    "Startdato",
    "Rådgiver",
];

pub const SKADE_HEADERS: [&str; 8] = [
    "Skadenummer",
    "Kunde",
    "Produkt",
    "Skadedato",
    "Status",
    "Utbetalt",
    "Reservert",
    "Beskrivelse",
];

const DATE_FORMAT: &str = "%d.%m.%Y";

fn write_csv<T>(headers: &[&str], rows: &[T], to_record: impl Fn(&T) -> Vec<String>) -> ServiceResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(headers).map_err(csv_error)?;
    for row in rows {
        writer.write_record(to_record(row)).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::Infrastructure(format!("CSV-eksport feilet: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::Infrastructure(format!("CSV-eksport feilet: {}", e)))
}

fn csv_error(err: csv::Error) -> ServiceError {
    tracing::error!(error = %err, "CSV write failed");
    ServiceError::Infrastructure(format!("CSV-eksport feilet: {}", err))
}

pub fn kunder_csv(rows: &[GarantiKundeRad]) -> ServiceResult<String> {
    write_csv(&KUNDE_HEADERS, rows, |r| {
        vec![
            r.organisasjonsnummer.clone(),
            r.kunde.clone(),
            r.produkt.clone(),
            r.garantibelop.to_string(),
            r.premie.to_string(),
            r.status.clone(),
            r.startdato.format(DATE_FORMAT).to_string(),
            r.radgiver.clone().unwrap_or_default(),
        ]
    })
}

pub fn skader_csv(rows: &[SkadeRad]) -> ServiceResult<String> {
    write_csv(&SKADE_HEADERS, rows, |r| {
        vec![
            r.skadenummer.clone(),
            r.kunde.clone(),
            r.produkt.clone(),
            r.skadedato.format(DATE_FORMAT).to_string(),
            r.status.clone(),
            r.utbetalt.to_string(),
            r.reservert.to_string(),
            r.beskrivelse.clone().unwrap_or_default(),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn skade() -> SkadeRad {
        SkadeRad {
            skadenummer: "S-2026-001".to_string(),
            kunde: "Hansen, Berg & Co".to_string(),
            produkt: "Kasko".to_string(),
            skadedato: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            status: "Åpen".to_string(),
            utbetalt: dec!(12500.50),
            reservert: dec!(0),
            beskrivelse: Some("Sa \"pang\", deretter stille".to_string()),
        }
    }

    #[test]
    fn test_every_field_quoted() {
        let csv = skader_csv(&[skade()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"Skadenummer\",\"Kunde\",\"Produkt\",\"Skadedato\",\"Status\",\"Utbetalt\",\"Reservert\",\"Beskrivelse\""
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"S-2026-001\",\"Hansen, Berg & Co\""));
        assert!(row.contains("\"09.03.2026\""));
        assert!(row.ends_with("\"Sa \"\"pang\"\", deretter stille\""));
    }

    #[test]
    fn test_round_trip() {
        let csv = skader_csv(&[skade()]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, SKADE_HEADERS);

        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[1], "Hansen, Berg & Co");
        assert_eq!(&record[5], "12500.50");
        assert_eq!(&record[7], "Sa \"pang\", deretter stille");
    }

    #[test]
    fn test_kunder_header_order_without_rows() {
        let csv = kunder_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("\"Organisasjonsnummer\",\"Kunde\""));
    }
}
