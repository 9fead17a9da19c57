use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW: usize = 7;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_PAIR_HISTORY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fenêtre de recherche après activation, en nombre de tirages (pas en jours).
    pub window: usize,
    /// Nombre de combos conservés dans le classement.
    pub top_n: usize,
    /// Nombre de PlayRecords gardés par combo (les plus récents).
    pub pair_history: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            top_n: DEFAULT_TOP_N,
            pair_history: DEFAULT_PAIR_HISTORY,
        }
    }
}

impl EngineConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}
