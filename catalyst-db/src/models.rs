use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tirage rejeté à l'ingestion. Le moteur ne voit jamais ces cas.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("{game} attend {expected} chiffres, reçu {actual}")]
    WrongDigitCount {
        game: Game,
        expected: usize,
        actual: usize,
    },

    #[error("chiffre {0} hors limites (0-9)")]
    DigitOutOfRange(u8),

    #[error("numéros illisibles : '{0}'")]
    InvalidNumbers(String),

    #[error("date invalide : '{0}'")]
    InvalidDate(String),

    #[error("tirage inconnu : '{0}' (midday ou evening)")]
    UnknownSlot(String),

    #[error("jeu inconnu : '{0}' (pick3 ou pick4)")]
    UnknownGame(String),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Pick3,
    Pick4,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::Pick3, Game::Pick4];

    pub fn pick_size(&self) -> usize {
        match self {
            Game::Pick3 => 3,
            Game::Pick4 => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Game::Pick3 => "pick3",
            Game::Pick4 => "pick4",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Game {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "").as_str() {
            "pick3" | "3" => Ok(Game::Pick3),
            "pick4" | "4" => Ok(Game::Pick4),
            _ => Err(DrawError::UnknownGame(s.to_string())),
        }
    }
}

/// Tirage intra-journalier. L'ordre dérivé (midday < evening) est l'ordre chronologique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Midday,
    Evening,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Midday => "midday",
            Slot::Evening => "evening",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "midday" | "mid" | "day" => Ok(Slot::Midday),
            "evening" | "eve" | "night" => Ok(Slot::Evening),
            _ => Err(DrawError::UnknownSlot(s.to_string())),
        }
    }
}

/// Clé utilisée dans les rapports pour un jeu sans tirage intra-journalier.
pub const SINGLE_DRAW_LABEL: &str = "draw";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub game: Game,
    pub date: NaiveDate,
    pub slot: Option<Slot>,
    pub numbers: Vec<u8>,
}

impl Draw {
    /// Construit un tirage validé : exactement `pick_size` chiffres, tous dans 0-9.
    pub fn new(
        game: Game,
        date: NaiveDate,
        slot: Option<Slot>,
        numbers: Vec<u8>,
    ) -> Result<Self, DrawError> {
        validate_numbers(game, &numbers)?;
        Ok(Self {
            game,
            date,
            slot,
            numbers,
        })
    }

    pub fn contains(&self, digit: u8) -> bool {
        self.numbers.contains(&digit)
    }

    pub fn slot_label(&self) -> &'static str {
        self.slot.map(|s| s.as_str()).unwrap_or(SINGLE_DRAW_LABEL)
    }

    pub fn numbers_str(&self) -> String {
        self.numbers
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

pub fn validate_numbers(game: Game, numbers: &[u8]) -> Result<(), DrawError> {
    if numbers.len() != game.pick_size() {
        return Err(DrawError::WrongDigitCount {
            game,
            expected: game.pick_size(),
            actual: numbers.len(),
        });
    }
    if let Some(&d) = numbers.iter().find(|&&d| d > 9) {
        return Err(DrawError::DigitOutOfRange(d));
    }
    Ok(())
}

/// Accepte `YYYY-MM-DD` (ISO), `MM-DD-YYYY` et `MM/DD/YYYY`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DrawError> {
    let s = raw.trim();
    ["%Y-%m-%d", "%m-%d-%Y", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| DrawError::InvalidDate(raw.to_string()))
}

/// "312", "3-1-2", "3 1 2" ou "3,1,2" → [3, 1, 2].
/// Avec séparateurs, chaque morceau est un nombre entier : "12-3-4" donne [12, 3, 4].
pub fn parse_digits(raw: &str) -> Result<Vec<u8>, DrawError> {
    let s = raw.trim();
    let invalid = || DrawError::InvalidNumbers(raw.to_string());

    if !s.contains(|c: char| matches!(c, ' ' | '-' | ',')) {
        return s
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8).ok_or_else(invalid))
            .collect();
    }

    s.split(|c: char| matches!(c, ' ' | '-' | ','))
        .filter(|token| !token.is_empty())
        .map(|token| {
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            token.parse::<u8>().map_err(|_| invalid())
        })
        .collect()
}

/// Ordre chronologique stable : date, puis slot (sans slot < midday < evening).
pub fn sort_history(draws: &mut [Draw]) {
    draws.sort_by_key(|d| (d.date, d.slot));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_game_pick_size() {
        assert_eq!(Game::Pick3.pick_size(), 3);
        assert_eq!(Game::Pick4.pick_size(), 4);
    }

    #[test]
    fn test_game_from_str() {
        assert_eq!("pick3".parse::<Game>().unwrap(), Game::Pick3);
        assert_eq!("Pick-4".parse::<Game>().unwrap(), Game::Pick4);
        assert_eq!("3".parse::<Game>().unwrap(), Game::Pick3);
        assert!(matches!("pick5".parse::<Game>(), Err(DrawError::UnknownGame(_))));
    }

    #[test]
    fn test_slot_from_str() {
        assert_eq!("midday".parse::<Slot>().unwrap(), Slot::Midday);
        assert_eq!(" Evening ".parse::<Slot>().unwrap(), Slot::Evening);
        assert!("morning".parse::<Slot>().is_err());
    }

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(Game::Pick3, &[0, 9, 5]).is_ok());
        assert!(validate_numbers(Game::Pick4, &[1, 2, 3, 4]).is_ok());
    }

    #[test]
    fn test_validate_numbers_wrong_count() {
        let err = validate_numbers(Game::Pick3, &[1, 2]).unwrap_err();
        assert_eq!(
            err,
            DrawError::WrongDigitCount {
                game: Game::Pick3,
                expected: 3,
                actual: 2
            }
        );
        assert!(validate_numbers(Game::Pick4, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert_eq!(
            validate_numbers(Game::Pick3, &[1, 12, 3]).unwrap_err(),
            DrawError::DigitOutOfRange(12)
        );
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-04-16").unwrap(), date("2025-04-16"));
        assert_eq!(parse_date("04-16-2025").unwrap(), date("2025-04-16"));
        assert_eq!(parse_date("04/16/2025").unwrap(), date("2025-04-16"));
        assert!(parse_date("16/04/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("312").unwrap(), vec![3, 1, 2]);
        assert_eq!(parse_digits("3-1-2").unwrap(), vec![3, 1, 2]);
        assert_eq!(parse_digits(" 3, 1, 2, 0 ").unwrap(), vec![3, 1, 2, 0]);
        assert!(parse_digits("3a2").is_err());
        assert!(parse_digits("3-a-2").is_err());
    }

    #[test]
    fn test_parse_digits_keeps_multi_digit_tokens() {
        assert_eq!(parse_digits("12-3-4").unwrap(), vec![12, 3, 4]);
        assert_eq!(parse_digits("1-23").unwrap(), vec![1, 23]);
        assert!(parse_digits("1-300").is_err());

        assert_eq!(
            Draw::new(Game::Pick4, date("2025-04-16"), None, parse_digits("12-3-4").unwrap()),
            Err(DrawError::WrongDigitCount { game: Game::Pick4, expected: 4, actual: 3 })
        );
        assert_eq!(
            validate_numbers(Game::Pick3, &parse_digits("1-23-4").unwrap()),
            Err(DrawError::DigitOutOfRange(23))
        );
    }

    #[test]
    fn test_draw_new_validates() {
        assert!(Draw::new(Game::Pick3, date("2024-01-01"), None, vec![1, 2, 3]).is_ok());
        assert!(Draw::new(Game::Pick4, date("2024-01-01"), None, vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_draw_helpers() {
        let draw = Draw::new(Game::Pick3, date("2024-01-01"), Some(Slot::Evening), vec![3, 1, 2]).unwrap();
        assert!(draw.contains(3));
        assert!(!draw.contains(7));
        assert_eq!(draw.slot_label(), "evening");
        assert_eq!(draw.numbers_str(), "3-1-2");

        let single = Draw::new(Game::Pick3, date("2024-01-01"), None, vec![0, 0, 0]).unwrap();
        assert_eq!(single.slot_label(), SINGLE_DRAW_LABEL);
    }

    #[test]
    fn test_sort_history_date_then_slot() {
        let mut draws = vec![
            Draw::new(Game::Pick3, date("2024-01-02"), Some(Slot::Midday), vec![1, 1, 1]).unwrap(),
            Draw::new(Game::Pick3, date("2024-01-01"), Some(Slot::Evening), vec![2, 2, 2]).unwrap(),
            Draw::new(Game::Pick3, date("2024-01-01"), Some(Slot::Midday), vec![3, 3, 3]).unwrap(),
        ];
        sort_history(&mut draws);
        assert_eq!(draws[0].numbers, vec![3, 3, 3]);
        assert_eq!(draws[1].numbers, vec![2, 2, 2]);
        assert_eq!(draws[2].numbers, vec![1, 1, 1]);
    }
}
