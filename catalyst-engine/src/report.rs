use std::collections::BTreeMap;

use catalyst_db::models::{Draw, Game};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::combo::{Combo, ComboAnalysis, ComboState};
use crate::config::EngineConfig;
use crate::ranking::{analyze_all, rank};

/// Dernier jour tiré d'un jeu : date + numéros par slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestDraw {
    pub date: Option<NaiveDate>,
    pub draws: BTreeMap<String, Vec<u8>>,
}

impl LatestDraw {
    /// Indépendant de l'ordre de `history` : prend la date maximale.
    pub fn from_history(history: &[Draw]) -> Self {
        let Some(date) = history.iter().map(|d| d.date).max() else {
            return Self::default();
        };
        let draws = history
            .iter()
            .filter(|d| d.date == date)
            .map(|d| (d.slot_label().to_string(), d.numbers.clone()))
            .collect();
        Self {
            date: Some(date),
            draws,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestResults {
    pub pick3: LatestDraw,
    pub pick4: LatestDraw,
}

/// Alerte fournie par l'appelant ; le moteur ne la calcule pas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub date: NaiveDate,
    pub combo: String,
    pub candidate: u8,
    pub action: String,
    pub source: String,
    pub result: String,
}

impl Alert {
    /// Entrée fixe historique affichée par l'interface tant qu'aucune logique d'alerte n'existe.
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            combo: "00".to_string(),
            candidate: 7,
            action: "play".to_string(),
            source: "Pick3".to_string(),
            result: "Pending".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUrl {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub combo_states: BTreeMap<Combo, ComboState>,
    /// Réservé (candidat → date d'expiration) ; toujours vide, jamais omis.
    pub stopped_candidates: BTreeMap<String, NaiveDate>,
}

impl StateSnapshot {
    pub fn from_analyses(analyses: &[ComboAnalysis]) -> Self {
        Self {
            combo_states: analyses.iter().map(|a| (a.combo, a.state)).collect(),
            stopped_candidates: BTreeMap::new(),
        }
    }
}

/// Métadonnées fournies par l'appelant, recopiées telles quelles.
#[derive(Debug, Clone, Default)]
pub struct ReportMeta {
    pub house: Option<String>,
    pub source_urls: Vec<SourceUrl>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub ok: bool,
    pub generated_at: DateTime<Local>,
    pub house: Option<String>,
    pub analyzed_game: Game,
    pub latest_results: LatestResults,
    pub source_urls: Vec<SourceUrl>,
    pub top_combos: Vec<ComboAnalysis>,
    pub alerts: Vec<Alert>,
    pub state_snapshot: StateSnapshot,
}

/// Historiques par jeu, en lecture seule pendant toute la génération.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameHistories<'a> {
    pub pick3: &'a [Draw],
    pub pick4: &'a [Draw],
}

impl<'a> GameHistories<'a> {
    pub fn get(&self, game: Game) -> &'a [Draw] {
        match game {
            Game::Pick3 => self.pick3,
            Game::Pick4 => self.pick4,
        }
    }

    pub fn latest_results(&self) -> LatestResults {
        LatestResults {
            pick3: LatestDraw::from_history(self.pick3),
            pick4: LatestDraw::from_history(self.pick4),
        }
    }
}

/// Assemblage pur : snapshot sur toutes les analyses, puis classement tronqué.
pub fn assemble_report(
    generated_at: DateTime<Local>,
    analyzed_game: Game,
    latest_results: LatestResults,
    analyses: Vec<ComboAnalysis>,
    top_n: usize,
    meta: ReportMeta,
) -> Report {
    let state_snapshot = StateSnapshot::from_analyses(&analyses);
    let top_combos = rank(analyses, top_n);

    Report {
        ok: true,
        generated_at,
        house: meta.house,
        analyzed_game,
        latest_results,
        source_urls: meta.source_urls,
        top_combos,
        alerts: meta.alerts,
        state_snapshot,
    }
}

pub fn generate_report(
    histories: GameHistories<'_>,
    analyzed_game: Game,
    config: &EngineConfig,
    meta: ReportMeta,
    generated_at: DateTime<Local>,
) -> Report {
    let history = histories.get(analyzed_game);
    log::info!(
        "Analyse {} : {} tirages, top {}",
        analyzed_game,
        history.len(),
        config.top_n
    );
    let analyses = analyze_all(history, config);
    assemble_report(
        generated_at,
        analyzed_game,
        histories.latest_results(),
        analyses,
        config.top_n,
        meta,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::daily_draws;
    use catalyst_db::models::Slot;

    fn now() -> DateTime<Local> {
        Local::now()
    }

    fn pick4_draw(date: &str, slot: Option<Slot>, numbers: &[u8]) -> Draw {
        Draw::new(
            Game::Pick4,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            slot,
            numbers.to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn test_latest_draw_empty() {
        let latest = LatestDraw::from_history(&[]);
        assert_eq!(latest.date, None);
        assert!(latest.draws.is_empty());
    }

    #[test]
    fn test_latest_draw_collects_both_slots() {
        let history = vec![
            pick4_draw("2024-03-01", Some(Slot::Evening), &[9, 9, 9, 9]),
            pick4_draw("2024-03-02", Some(Slot::Midday), &[1, 2, 3, 4]),
            pick4_draw("2024-03-02", Some(Slot::Evening), &[5, 6, 7, 8]),
        ];
        let latest = LatestDraw::from_history(&history);

        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(latest.draws.len(), 2);
        assert_eq!(latest.draws["midday"], vec![1, 2, 3, 4]);
        assert_eq!(latest.draws["evening"], vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_latest_draw_descending_input() {
        let mut history = daily_draws(&[[1, 1, 1], [2, 2, 2], [3, 3, 3]]);
        history.reverse();
        let latest = LatestDraw::from_history(&history);

        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 1, 3));
        assert_eq!(latest.draws["draw"], vec![3, 3, 3]);
    }

    #[test]
    fn test_report_completeness() {
        let pick3 = daily_draws(&[[3, 1, 2], [1, 1, 1], [7, 0, 0]]);
        let histories = GameHistories {
            pick3: &pick3,
            pick4: &[],
        };
        let report = generate_report(
            histories,
            Game::Pick3,
            &EngineConfig::default(),
            ReportMeta::default(),
            now(),
        );

        assert!(report.ok);
        assert_eq!(report.state_snapshot.combo_states.len(), 100);
        assert!(report.state_snapshot.stopped_candidates.is_empty());
        assert_eq!(report.top_combos.len(), 10);
        assert_eq!(report.top_combos[0].combo.to_string(), "30");
        assert_eq!(report.top_combos[0].wins, 1);
    }

    #[test]
    fn test_empty_pick4_history() {
        let pick3 = daily_draws(&[[3, 1, 2]]);
        let histories = GameHistories {
            pick3: &pick3,
            pick4: &[],
        };
        let report = generate_report(
            histories,
            Game::Pick4,
            &EngineConfig::default(),
            ReportMeta::default(),
            now(),
        );

        assert_eq!(report.latest_results.pick4.date, None);
        assert_eq!(report.latest_results.pick3.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(report.state_snapshot.combo_states.len(), 100);
        assert!(report
            .state_snapshot
            .combo_states
            .values()
            .all(|s| *s == ComboState::Off));
        assert!(report.top_combos.iter().all(|c| c.wins == 0));
    }

    #[test]
    fn test_snapshot_covers_all_not_only_top() {
        let pick3 = daily_draws(&[[3, 0, 0], [1, 1, 1]]);
        let histories = GameHistories {
            pick3: &pick3,
            pick4: &[],
        };
        let config = EngineConfig::default().with_top_n(5);
        let report = generate_report(histories, Game::Pick3, &config, ReportMeta::default(), now());

        assert_eq!(report.top_combos.len(), 5);
        let thirty: Combo = "30".parse().unwrap();
        assert_eq!(report.state_snapshot.combo_states[&thirty], ComboState::Active);
        let fifty: Combo = "50".parse().unwrap();
        assert_eq!(report.state_snapshot.combo_states[&fifty], ComboState::Off);
    }

    #[test]
    fn test_meta_copied_through() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let meta = ReportMeta {
            house: Some("Illinois".to_string()),
            source_urls: vec![SourceUrl {
                name: "Illinois Lottery".to_string(),
                url: "https://www.lottery.net/illinois".to_string(),
            }],
            alerts: vec![Alert::placeholder(date)],
        };
        let report = assemble_report(
            now(),
            Game::Pick3,
            LatestResults::default(),
            Vec::new(),
            10,
            meta,
        );

        assert_eq!(report.house.as_deref(), Some("Illinois"));
        assert_eq!(report.source_urls.len(), 1);
        assert_eq!(report.alerts, vec![Alert::placeholder(date)]);
        assert!(report.top_combos.is_empty());
    }

    #[test]
    fn test_report_json_shape() {
        let pick3 = daily_draws(&[[3, 1, 2], [7, 0, 0]]);
        let histories = GameHistories {
            pick3: &pick3,
            pick4: &[],
        };
        let report = generate_report(
            histories,
            Game::Pick3,
            &EngineConfig::default(),
            ReportMeta::default(),
            now(),
        );
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["generated_at"].is_string());
        assert_eq!(json["analyzed_game"], "pick3");
        assert!(json["latest_results"]["pick4"]["date"].is_null());
        assert!(json["latest_results"]["pick4"]["draws"].as_object().unwrap().is_empty());
        assert_eq!(json["latest_results"]["pick3"]["date"], "2024-01-02");
        assert_eq!(json["latest_results"]["pick3"]["draws"]["draw"][0], 7);
        assert_eq!(json["state_snapshot"]["combo_states"].as_object().unwrap().len(), 100);
        assert_eq!(json["state_snapshot"]["combo_states"]["30"], "off");
        assert!(json["state_snapshot"]["stopped_candidates"].as_object().unwrap().is_empty());
        assert!(json["alerts"].as_array().unwrap().is_empty());
        assert_eq!(json["top_combos"][0]["combo"], "30");
    }

    #[test]
    fn test_report_json_reload() {
        let pick3 = daily_draws(&[[3, 1, 2], [7, 0, 0]]);
        let histories = GameHistories {
            pick3: &pick3,
            pick4: &[],
        };
        let report = generate_report(
            histories,
            Game::Pick3,
            &EngineConfig::default(),
            ReportMeta::default(),
            now(),
        );
        let json = serde_json::to_string(&report).unwrap();
        let restored: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.top_combos, report.top_combos);
        assert_eq!(restored.state_snapshot, report.state_snapshot);
    }
}
