use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{parse_digits, sort_history, Draw, Game, Slot};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    game     TEXT NOT NULL,
    date     TEXT NOT NULL,
    slot     TEXT NOT NULL DEFAULT '',
    numbers  TEXT NOT NULL,
    PRIMARY KEY (game, date, slot)
);
";

/// `$CATALYST_DB` si défini, sinon `./data/catalyst.db`.
pub fn db_path() -> std::path::PathBuf {
    if let Some(path) = std::env::var_os("CATALYST_DB") {
        return path.into();
    }
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("catalyst.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Insère un tirage ; `false` si (jeu, date, slot) existe déjà.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let numbers: String = draw.numbers.iter().map(|d| char::from(b'0' + d)).collect();
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (game, date, slot, numbers) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            draw.game.as_str(),
            draw.date.format("%Y-%m-%d").to_string(),
            draw.slot.map(|s| s.as_str()).unwrap_or(""),
            numbers,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(game: Game, date: &str, slot: &str, numbers: &str) -> Result<Draw> {
    let date = crate::models::parse_date(date)?;
    let slot = if slot.is_empty() {
        None
    } else {
        Some(slot.parse::<Slot>()?)
    };
    let draw = Draw::new(game, date, slot, parse_digits(numbers)?)?;
    Ok(draw)
}

fn query_draws<P: rusqlite::Params>(conn: &Connection, sql: &str, game: Game, params: P) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?.collect::<Result<Vec<_>, _>>()?;

    rows.iter()
        .map(|(date, slot, numbers)| {
            row_to_draw(game, date, slot, numbers)
                .with_context(|| format!("Ligne corrompue en base : {game} {date} {slot}"))
        })
        .collect()
}

/// Historique complet d'un jeu, du plus ancien au plus récent.
pub fn fetch_history(conn: &Connection, game: Game) -> Result<Vec<Draw>> {
    let mut draws = query_draws(
        conn,
        "SELECT date, slot, numbers FROM draws WHERE game = ?1 ORDER BY date ASC",
        game,
        [game.as_str()],
    )?;
    sort_history(&mut draws);
    log::debug!("{} tirages {} chargés", draws.len(), game);
    Ok(draws)
}

/// Derniers tirages d'un jeu, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, game: Game, limit: u32) -> Result<Vec<Draw>> {
    query_draws(
        conn,
        "SELECT date, slot, numbers FROM draws WHERE game = ?1
         ORDER BY date DESC, CASE slot WHEN 'evening' THEN 2 WHEN 'midday' THEN 1 ELSE 0 END DESC
         LIMIT ?2",
        game,
        rusqlite::params![game.as_str(), limit],
    )
}

pub fn count_draws(conn: &Connection, game: Option<Game>) -> Result<u32> {
    let count: u32 = match game {
        Some(g) => conn.query_row(
            "SELECT COUNT(*) FROM draws WHERE game = ?1",
            [g.as_str()],
            |row| row.get(0),
        )?,
        None => conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?,
    };
    Ok(count)
}
