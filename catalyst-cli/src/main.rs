mod display;
mod import;
mod settings;
mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use catalyst_db::db::{count_draws, db_path, fetch_history, fetch_last_draws, insert_draw, migrate, open_db};
use catalyst_db::models::Game;
use catalyst_db::rusqlite::Connection;
use catalyst_engine::combo::{analyze_combo, Combo};
use catalyst_engine::ranking::top_combos;
use catalyst_engine::report::{generate_report, Alert, GameHistories, ReportMeta, SourceUrl};

use crate::display::{display_combo_detail, display_draws, display_import_summary, display_ranking};
use crate::import::{import_file, ImportFormat};
use crate::settings::{resolve_config, save_config};

#[derive(Parser)]
#[command(name = "catalyst", about = "Analyse des combos Pick-3 / Pick-4")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer un historique de tirages (CSV ou JSON brut)
    Import {
        /// Chemin vers le fichier
        #[arg(short, long)]
        file: PathBuf,

        /// Format du fichier (défaut : déduit de l'extension)
        #[arg(long)]
        format: Option<ImportFormat>,
    },

    /// Générer un historique aléatoire (midday + evening) pour les deux jeux
    Simulate {
        /// Nombre de jours, jusqu'à aujourd'hui
        #[arg(short, long, default_value = "365")]
        days: u32,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        #[arg(short, long, default_value = "pick3")]
        game: Game,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Classer les 100 combos sur l'historique d'un jeu
    Analyze {
        #[arg(short, long, default_value = "pick3")]
        game: Game,

        /// Nombre de combos retenus (remplace top_n de la configuration)
        #[arg(short, long)]
        top: Option<usize>,

        /// Fichier de configuration du moteur (JSON)
        #[arg(short, long, env = "CATALYST_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Détail d'un combo : activations et gains
    Combo {
        /// Libellé du combo (ex: 34)
        label: Combo,

        #[arg(short, long, default_value = "pick3")]
        game: Game,

        #[arg(short, long, env = "CATALYST_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Produire le rapport JSON complet
    Report {
        #[arg(short, long, default_value = "pick3")]
        game: Game,

        #[arg(short, long)]
        top: Option<usize>,

        #[arg(short, long, env = "CATALYST_CONFIG")]
        config: Option<PathBuf>,

        /// Fichier de sortie (défaut : sortie standard)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Nom de la loterie affiché dans le rapport
        #[arg(long)]
        house: Option<String>,

        /// Source à citer, au format NOM=URL (répétable)
        #[arg(long = "source")]
        sources: Vec<String>,

        /// Ne pas inclure l'alerte fixe par défaut
        #[arg(long)]
        no_placeholder_alert: bool,
    },

    /// Écrire la configuration par défaut du moteur
    InitConfig {
        #[arg(short, long, default_value = "catalyst.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::InitConfig { output } => cmd_init_config(&output),
        Command::DbPath => {
            println!("{}", db_path().display());
            Ok(())
        }
        Command::Import { file, format } => cmd_import(&connect()?, &file, format),
        Command::Simulate { days, seed } => cmd_simulate(&connect()?, days, seed),
        Command::List { game, last } => cmd_list(&connect()?, game, last),
        Command::Analyze { game, top, config } => cmd_analyze(&connect()?, game, top, config.as_deref()),
        Command::Combo { label, game, config } => cmd_combo(&connect()?, label, game, config.as_deref()),
        Command::Report {
            game,
            top,
            config,
            output,
            house,
            sources,
            no_placeholder_alert,
        } => {
            let meta = build_meta(house, &sources, !no_placeholder_alert)?;
            cmd_report(&connect()?, game, top, config.as_deref(), output.as_deref(), meta)
        }
    }
}

/// Ouvre la base et applique le schéma.
fn connect() -> Result<Connection> {
    let conn = open_db(&db_path())?;
    migrate(&conn)?;
    Ok(conn)
}

fn cmd_import(conn: &Connection, file: &Path, format: Option<ImportFormat>) -> Result<()> {
    let format = format.unwrap_or_else(|| ImportFormat::from_path(file));
    let result = import_file(conn, file, format)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_simulate(conn: &Connection, days: u32, seed: Option<u64>) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    for game in Game::ALL {
        let game_seed = seed.map(|s| s.wrapping_add(game.pick_size() as u64));
        let draws = simulate::generate_mock_draws(game, days, today, game_seed);
        let mut inserted = 0u32;
        for draw in &draws {
            if insert_draw(&tx, draw)? {
                inserted += 1;
            }
        }
        println!("{} : {} tirages générés, {} insérés", game, draws.len(), inserted);
    }

    tx.commit().context("Échec du commit")?;
    Ok(())
}

fn cmd_list(conn: &Connection, game: Game, last: u32) -> Result<()> {
    let n = count_draws(conn, Some(game))?;
    if n == 0 {
        println!("Aucun tirage {game} en base. Lancez d'abord : catalyst import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, game, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_analyze(conn: &Connection, game: Game, top: Option<usize>, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path, top)?;
    let history = fetch_history(conn, game)?;
    if history.is_empty() {
        println!("Aucun tirage {game} en base. Lancez d'abord : catalyst import");
        return Ok(());
    }

    let ranked = top_combos(&history, &config);
    display_ranking(&ranked, game, history.len());
    Ok(())
}

fn cmd_combo(conn: &Connection, label: Combo, game: Game, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path, None)?;
    let history = fetch_history(conn, game)?;
    let result = analyze_combo(label, &history, &config);
    display_combo_detail(&result);
    Ok(())
}

fn parse_source(raw: &str) -> Result<SourceUrl> {
    let (name, url) = raw
        .split_once('=')
        .with_context(|| format!("Source invalide '{}' (attendu NOM=URL)", raw))?;
    Ok(SourceUrl {
        name: name.trim().to_string(),
        url: url.trim().to_string(),
    })
}

fn build_meta(house: Option<String>, sources: &[String], placeholder_alert: bool) -> Result<ReportMeta> {
    let source_urls = sources
        .iter()
        .map(|s| parse_source(s))
        .collect::<Result<Vec<_>>>()?;
    let alerts = if placeholder_alert {
        vec![Alert::placeholder(chrono::Local::now().date_naive())]
    } else {
        Vec::new()
    };
    Ok(ReportMeta {
        house,
        source_urls,
        alerts,
    })
}

fn cmd_report(
    conn: &Connection,
    game: Game,
    top: Option<usize>,
    config_path: Option<&Path>,
    output: Option<&Path>,
    meta: ReportMeta,
) -> Result<()> {
    let config = resolve_config(config_path, top)?;
    let pick3 = fetch_history(conn, Game::Pick3)?;
    let pick4 = fetch_history(conn, Game::Pick4)?;
    let histories = GameHistories {
        pick3: &pick3,
        pick4: &pick4,
    };

    let report = generate_report(histories, game, &config, meta, chrono::Local::now());
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Impossible d'écrire {:?}", path))?;
            println!("Rapport sauvegardé dans : {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_init_config(output: &Path) -> Result<()> {
    save_config(&catalyst_engine::config::EngineConfig::default(), output)?;
    println!("Configuration par défaut écrite dans : {}", output.display());
    Ok(())
}
