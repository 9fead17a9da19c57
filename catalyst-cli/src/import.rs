use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use catalyst_db::db::insert_draw;
use catalyst_db::models::{parse_date, parse_digits, Draw, DrawError, Game, Slot};
use catalyst_db::rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImportFormat {
    /// `game;date;slot;numbers`, avec en-tête
    Csv,
    /// Historique brut : {"pick3": {"MM-DD-YYYY": {"midday": [..], "evening": [..]}}}
    Json,
}

impl ImportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ImportFormat::Json,
            _ => ImportFormat::Csv,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

fn field(record: &csv::StringRecord, idx: usize) -> Result<&str> {
    record
        .get(idx)
        .map(str::trim)
        .with_context(|| format!("Champ manquant à l'index {}", idx))
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let game: Game = field(record, 0)?.parse()?;
    let date = parse_date(field(record, 1)?)?;
    let slot = match record.get(2).map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(s.parse::<Slot>()?),
    };
    let numbers = parse_digits(field(record, 3)?)?;

    Ok(Draw::new(game, date, slot, numbers)?)
}

pub fn parse_csv<R: Read>(reader: R) -> Vec<Result<Draw>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(reader);

    reader
        .records()
        .map(|record| {
            let record = record.context("Ligne CSV illisible")?;
            parse_record(&record)
        })
        .collect()
}

type RawHistory = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<i64>>>>;

fn raw_digits(values: &[i64]) -> Result<Vec<u8>, DrawError> {
    values
        .iter()
        .map(|&v| u8::try_from(v).map_err(|_| DrawError::InvalidNumbers(v.to_string())))
        .collect()
}

fn raw_entry(game: Game, raw_date: &str, raw_slot: &str, values: &[i64]) -> Result<Draw> {
    let date = parse_date(raw_date)?;
    let slot = raw_slot.parse::<Slot>()?;
    Ok(Draw::new(game, date, Some(slot), raw_digits(values)?)?)
}

/// Format brut du collecteur : jeu → date → slot → chiffres.
pub fn parse_raw_json(text: &str) -> Result<Vec<Result<Draw>>> {
    let raw: RawHistory = serde_json::from_str(text).context("JSON d'historique invalide")?;
    let mut draws = Vec::new();

    for (game_key, by_date) in &raw {
        let game = match game_key.parse::<Game>() {
            Ok(g) => g,
            Err(e) => {
                draws.push(Err(e.into()));
                continue;
            }
        };
        for (raw_date, by_slot) in by_date {
            for (raw_slot, values) in by_slot {
                let draw = raw_entry(game, raw_date, raw_slot, values)
                    .with_context(|| format!("{game} {raw_date} {raw_slot}"));
                draws.push(draw);
            }
        }
    }

    Ok(draws)
}

/// Insère les tirages valides dans une transaction ; les lignes en erreur sont comptées.
pub fn store_draws(conn: &Connection, parsed: Vec<Result<Draw>>) -> Result<ImportResult> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for parsed_draw in parsed {
        result.total_records += 1;
        match parsed_draw {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    log::warn!("Erreur insertion tirage {}: {:#}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Erreur parsing ligne {}: {:#}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

pub fn import_file(conn: &Connection, path: &Path, format: ImportFormat) -> Result<ImportResult> {
    let parsed = match format {
        ImportFormat::Csv => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
            parse_csv(file)
        }
        ImportFormat::Json => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Impossible de lire {:?}", path))?;
            parse_raw_json(&text)?
        }
    };
    log::info!("{} enregistrements lus depuis {:?}", parsed.len(), path);
    store_draws(conn, parsed)
}
