use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use catalyst_db::models::{Draw, Game};
use catalyst_engine::combo::{ComboAnalysis, ComboState, PlayRecord};

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "—".to_string())
}

fn state_cell(state: ComboState) -> Cell {
    let color = match state {
        ComboState::Active => Color::Green,
        ComboState::Off => Color::White,
    };
    Cell::new(state.to_string()).fg(color)
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Jeu", "Tirage", "Chiffres"]);

    for draw in draws {
        table.add_row(vec![
            draw.date.to_string(),
            draw.game.to_string(),
            draw.slot_label().to_string(),
            draw.numbers_str(),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_ranking(results: &[ComboAnalysis], game: Game, n_draws: usize) {
    println!("\n🎯 Top {} combos — {} ({} tirages)\n", results.len(), game, n_draws);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Combo", "Gains", "Dernier jeu", "Dernier gain", "État"]);

    for (i, r) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(r.combo.to_string()),
            Cell::new(r.wins),
            Cell::new(date_or_dash(r.latest_play)),
            Cell::new(date_or_dash(r.latest_win)),
            state_cell(r.state),
        ]);
    }
    println!("{table}");
}

pub fn display_combo_detail(result: &ComboAnalysis) {
    println!(
        "\nCombo {} : base {} → candidat {} (suffixe {})",
        result.combo,
        result.combo.base_digit(),
        result.combo.candidate_digit(),
        result.combo.suffix_digit()
    );
    println!("  Gains        : {}", result.wins);
    println!("  Dernier jeu  : {}", date_or_dash(result.latest_play));
    println!("  Dernier gain : {}", date_or_dash(result.latest_win));
    println!("  État         : {}", result.state);

    if result.pairs.is_empty() {
        println!("\nAucune activation.");
        return;
    }
    display_pairs(&result.pairs);
}

fn display_pairs(pairs: &[PlayRecord]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Jouée le", "Base", "Candidat", "Gagnée le"]);

    for p in pairs {
        let win = match p.win_date {
            Some(d) => Cell::new(d.to_string()).fg(Color::Green),
            None => Cell::new("—").fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(p.play_date.to_string()),
            Cell::new(p.base),
            Cell::new(p.candidate),
            win,
        ]);
    }
    println!("{table}");
}
