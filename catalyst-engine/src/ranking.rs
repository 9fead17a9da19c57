use catalyst_db::models::Draw;
use rayon::prelude::*;

use crate::combo::{analyze_combo, Combo, ComboAnalysis, ComboState};
use crate::config::EngineConfig;

/// Rejoue l'historique pour les 100 combos, en parallèle avec Rayon.
/// Le résultat reste dans l'ordre des libellés (00..99).
pub fn analyze_all(history: &[Draw], config: &EngineConfig) -> Vec<ComboAnalysis> {
    let combos: Vec<Combo> = Combo::all().collect();

    let results: Vec<ComboAnalysis> = combos
        .par_iter()
        .map(|&combo| analyze_combo(combo, history, config))
        .collect();

    let active = results.iter().filter(|r| r.state == ComboState::Active).count();
    log::debug!(
        "{} combos rejoués sur {} tirages ({} actifs)",
        results.len(),
        history.len(),
        active,
    );

    results
}

/// Tri par victoires décroissantes ; à égalité, libellé croissant. Tronque à `top_n`.
pub fn rank(mut results: Vec<ComboAnalysis>, top_n: usize) -> Vec<ComboAnalysis> {
    results.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.combo.cmp(&b.combo)));
    results.truncate(top_n);
    results
}

pub fn top_combos(history: &[Draw], config: &EngineConfig) -> Vec<ComboAnalysis> {
    rank(analyze_all(history, config), config.top_n)
}
