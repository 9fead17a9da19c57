use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use catalyst_db::models::{sort_history, Draw, Game, Slot};

/// Historique aléatoire de `days` jours se terminant à `end`, deux tirages par jour.
/// Sert à tester le pipeline sans source de données réelle.
pub fn generate_mock_draws(game: Game, days: u32, end: NaiveDate, seed: Option<u64>) -> Vec<Draw> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut draws = Vec::with_capacity(days as usize * 2);
    for offset in 0..days {
        let Some(date) = end.checked_sub_days(chrono::Days::new(offset as u64)) else {
            break;
        };
        for slot in [Slot::Midday, Slot::Evening] {
            let numbers: Vec<u8> = (0..game.pick_size()).map(|_| rng.random_range(0..10u8)).collect();
            draws.push(Draw {
                game,
                date,
                slot: Some(slot),
                numbers,
            });
        }
    }

    sort_history(&mut draws);
    draws
}
