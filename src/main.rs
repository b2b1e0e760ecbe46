use bdm_couponer::core::ledger::LEDGER_FILE;
use bdm_couponer::utils::logger;
use bdm_couponer::{
    CliArgs, Couponer, CouponerConfig, CouponerError, HttpRedeemer, ListingSource, LocalStorage,
    RedemptionLedger,
};
use clap::Parser;

fn exit_with(e: &CouponerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("⚠️ Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting BDM auto couponer");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入設定，命令列參數優先
    let mut config = match CouponerConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    args.apply_overrides(&mut config);

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    tracing::info!(
        "👤 Family Name: {}, Region: {}",
        settings.account.family_name,
        settings.account.region
    );
    tracing::debug!("Settings: {:?}", settings);

    let storage = LocalStorage::new(&settings.cache_dir);
    let ledger = RedemptionLedger::load(storage, LEDGER_FILE).await;
    let source = ListingSource::new(&settings.listing_url, settings.request_timeout)?;
    let redeemer = HttpRedeemer::new(&settings.redeem_url, settings.request_timeout)?;

    let mut couponer = Couponer::new(source, redeemer, ledger, settings.account.clone());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No coupons will be submitted");
        let pending = couponer.preview().await;
        if pending.is_empty() {
            println!("No new coupons to submit.");
        }
        for code in pending {
            println!("Would submit coupon '{}'", code);
        }
        return Ok(());
    }

    if args.once {
        let report = couponer.run_cycle().await;
        println!(
            "✅ Cycle complete: {} submitted, {} resolved",
            report.submitted(),
            report.resolved()
        );
        return Ok(());
    }

    couponer.run(settings.interval, shutdown_signal()).await;
    Ok(())
}
