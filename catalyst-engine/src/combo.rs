use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use catalyst_db::models::Draw;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::replacement::replacement_of;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("combo invalide : '{0}' (deux chiffres attendus, ex: 34)")]
pub struct ParseComboError(pub String);

/// Libellé "BC". Seul le premier chiffre (la base) pilote la simulation ;
/// le second n'est qu'une étiquette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Combo {
    base: u8,
    suffix: u8,
}

impl Combo {
    pub fn new(base: u8, suffix: u8) -> Option<Self> {
        (base <= 9 && suffix <= 9).then_some(Self { base, suffix })
    }

    /// Les 100 combos 00..99, dans l'ordre des libellés.
    pub fn all() -> impl Iterator<Item = Combo> {
        (0..100u8).map(|i| Combo {
            base: i / 10,
            suffix: i % 10,
        })
    }

    pub fn base_digit(&self) -> u8 {
        self.base
    }

    pub fn suffix_digit(&self) -> u8 {
        self.suffix
    }

    pub fn candidate_digit(&self) -> u8 {
        replacement_of(self.base)
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.suffix)
    }
}

impl FromStr for Combo {
    type Err = ParseComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        match bytes {
            [b, c] if b.is_ascii_digit() && c.is_ascii_digit() => {
                Combo::new(b - b'0', c - b'0').ok_or_else(|| ParseComboError(s.to_string()))
            }
            _ => Err(ParseComboError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Combo {
    type Error = ParseComboError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Combo> for String {
    fn from(combo: Combo) -> Self {
        combo.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComboState {
    #[default]
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "on")]
    Active,
}

impl fmt::Display for ComboState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComboState::Off => write!(f, "off"),
            ComboState::Active => write!(f, "on"),
        }
    }
}

/// Une activation et son issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub play_date: NaiveDate,
    pub candidate: u8,
    pub base: u8,
    pub win_date: Option<NaiveDate>,
}

/// Résultat figé d'un rejeu complet pour un combo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboAnalysis {
    pub combo: Combo,
    pub wins: u32,
    pub latest_play: Option<NaiveDate>,
    pub latest_win: Option<NaiveDate>,
    pub pairs: Vec<PlayRecord>,
    pub state: ComboState,
}

/// État d'un combo pendant le rejeu de l'historique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboRun {
    pub state: ComboState,
    pub win_count: u32,
    pub latest_play: Option<NaiveDate>,
    pub latest_win: Option<NaiveDate>,
    pairs: VecDeque<PlayRecord>,
    pair_limit: usize,
}

impl ComboRun {
    pub fn new(pair_limit: usize) -> Self {
        Self {
            state: ComboState::Off,
            win_count: 0,
            latest_play: None,
            latest_win: None,
            pairs: VecDeque::with_capacity(pair_limit),
            pair_limit,
        }
    }

    /// Traite `history[index]`. Une activation ne se produit qu'à l'état OFF ;
    /// la fenêtre est résolue immédiatement sur les `window` tirages suivants.
    pub fn observe(&mut self, base: u8, history: &[Draw], index: usize, window: usize) {
        let Some(draw) = history.get(index) else {
            return;
        };
        if self.state == ComboState::Active || !draw.contains(base) {
            return;
        }

        let candidate = replacement_of(base);
        self.state = ComboState::Active;
        self.latest_play = Some(draw.date);

        let win_date = find_win(candidate, history, index + 1, window);
        if let Some(win) = win_date {
            self.win_count += 1;
            self.latest_win = Some(win);
            self.state = ComboState::Off;
        }

        self.push_pair(PlayRecord {
            play_date: draw.date,
            candidate,
            base,
            win_date,
        });
    }

    fn push_pair(&mut self, record: PlayRecord) {
        self.pairs.push_back(record);
        while self.pairs.len() > self.pair_limit {
            self.pairs.pop_front();
        }
    }

    pub fn finish(self, combo: Combo) -> ComboAnalysis {
        ComboAnalysis {
            combo,
            wins: self.win_count,
            latest_play: self.latest_play,
            latest_win: self.latest_win,
            pairs: self.pairs.into(),
            state: self.state,
        }
    }
}

/// Date du premier tirage de `history[start..start + window]` contenant `candidate`.
pub fn find_win(candidate: u8, history: &[Draw], start: usize, window: usize) -> Option<NaiveDate> {
    history
        .iter()
        .skip(start)
        .take(window)
        .find(|draw| draw.contains(candidate))
        .map(|draw| draw.date)
}

/// Rejoue tout l'historique (ordre chronologique) pour un combo.
pub fn analyze_combo(combo: Combo, history: &[Draw], config: &EngineConfig) -> ComboAnalysis {
    let base = combo.base_digit();
    let mut run = ComboRun::new(config.pair_history);
    for index in 0..history.len() {
        run.observe(base, history, index, config.window);
    }
    run.finish(combo)
}

/// Historique pick-3 de test : un tirage par jour à partir du 2024-01-01.
#[cfg(test)]
pub(crate) fn daily_draws(numbers: &[[u8; 3]]) -> Vec<Draw> {
    use catalyst_db::models::Game;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    numbers
        .iter()
        .enumerate()
        .map(|(i, n)| {
            Draw::new(Game::Pick3, start + chrono::Duration::days(i as i64), None, n.to_vec()).unwrap()
        })
        .collect()
}
