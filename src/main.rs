use clap::Parser;
use santa_cycle::config::cli::{Cli, Command, HistoryArgs, SolveArgs, SourceArgs};
use santa_cycle::config::{LogFormat, RunConfig, SantaConfig};
use santa_cycle::core::{ConfigProvider, HistoryStore};
use santa_cycle::utils::error::{ErrorSeverity, Result, SantaError};
use santa_cycle::utils::{logger, validation::Validate};
use santa_cycle::{
    AssignRequest, AssignmentEngine, FileRosterSource, JsonHistoryStore, MemoryHistoryStore, Pair,
};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct PairRow<'a> {
    giver_name: &'a str,
    giver_email: &'a str,
    receiver_name: &'a str,
    receiver_email: &'a str,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 載入 TOML 配置 (可選)
    let file_config = match cli.config.as_deref().map(SantaConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let logging = file_config.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    let verbose = cli.verbose || logging.verbose.unwrap_or(false);
    match cli.log_format.or(logging.format).unwrap_or_default() {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }

    tracing::info!("Starting santa-cycle");
    if verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    if let Err(e) = run(&cli, file_config.as_ref()).await {
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2, // 限制條件無解
            ErrorSeverity::High => 1,   // 輸入或配置錯誤
            ErrorSeverity::Critical => 3, // 檔案或儲存錯誤
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: &Cli, file_config: Option<&SantaConfig>) -> Result<()> {
    if let Some(config) = file_config {
        config.validate()?;
    }

    let (source, year, seed) = match &cli.command {
        Command::Solve(args) => (&args.source, args.year, args.seed),
        Command::History(args) => (&args.source, args.year, None),
        Command::Candidates(args) => (args, None, None),
    };
    let config = resolve(file_config, source, year, seed)?;

    match config.history_path() {
        Some(path) => {
            let store = JsonHistoryStore::new(path);
            execute(&cli.command, &config, store).await
        }
        None => {
            tracing::warn!("No history file configured, assignments will not be remembered");
            execute(&cli.command, &config, MemoryHistoryStore::new()).await
        }
    }
}

fn resolve(
    file_config: Option<&SantaConfig>,
    source: &SourceArgs,
    year: Option<i32>,
    seed: Option<u64>,
) -> Result<RunConfig> {
    let config = RunConfig::layered(
        file_config,
        source.roster.clone(),
        source.history.clone(),
        seed,
        year,
    )?;
    config.validate()?;
    Ok(config)
}

async fn execute<H: HistoryStore>(command: &Command, config: &RunConfig, store: H) -> Result<()> {
    let roster_source = FileRosterSource::new(config.roster_path());
    let group = roster_source.read().await?.group;
    let engine = AssignmentEngine::new(roster_source, store);

    match command {
        Command::Solve(args) => solve_command(&engine, &group, config, args).await,
        Command::History(HistoryArgs { .. }) => {
            let entries = engine.history(&group, config.year()).await?;
            if entries.is_empty() {
                println!("No recorded assignments for '{}'", group);
            }
            for entry in entries {
                println!("{}  {} → {}", entry.year, entry.giver_name, entry.receiver_name);
            }
            Ok(())
        }
        Command::Candidates(_) => {
            for (giver, receivers) in engine.candidates(&group).await? {
                let names: Vec<&str> = receivers.iter().map(|p| p.name.as_str()).collect();
                println!("{} → {}", giver.name, names.join(", "));
            }
            Ok(())
        }
    }
}

async fn solve_command<H: HistoryStore>(
    engine: &AssignmentEngine<FileRosterSource, H>,
    group: &santa_cycle::GroupId,
    config: &RunConfig,
    args: &SolveArgs,
) -> Result<()> {
    let request = AssignRequest {
        year: config.year(),
        seed: config.seed(),
        dry_run: args.dry_run,
    };
    let outcome = engine.assign(group, request).await?;

    println!("🎁 {} ({}), seed {}", outcome.group, outcome.year, outcome.seed);
    for pair in &outcome.pairs {
        println!(
            "   {} <{}> → {} <{}>",
            pair.giver.name, pair.giver.email, pair.receiver.name, pair.receiver.email
        );
    }

    if let Some(output) = &args.output {
        write_pairs_csv(output, &outcome.pairs)?;
        println!("📁 Pairs saved to: {}", output.display());
    }

    if args.dry_run {
        println!("🔍 Dry run, nothing recorded");
    } else {
        println!("✅ Recorded {} new assignment(s)", outcome.recorded);
    }
    Ok(())
}

fn write_pairs_csv(path: &Path, pairs: &[Pair]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for pair in pairs {
        writer.serialize(PairRow {
            giver_name: &pair.giver.name,
            giver_email: &pair.giver.email,
            receiver_name: &pair.receiver.name,
            receiver_email: &pair.receiver.email,
        })?;
    }
    writer.flush().map_err(SantaError::IoError)?;
    Ok(())
}
