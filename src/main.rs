//! Wallet Factory CLI
//!
//! Usage:
//!   wallet_factory predict-unsigned --factory 0x.. --implementation 0x.. --salt 0x.. --scheme hash-mix
//!   wallet_factory predict-signed --factory 0x.. --implementation 0x.. --signature 0x..
//!   wallet_factory sign --secret-key 0x..
//!   wallet_factory recover --signature 0x..
//!   wallet_factory mine --factory 0x.. --implementation 0x.. --scheme hash-mix -p dead

use std::process;
use std::time::Duration;

use clap::Parser;

use wallet_factory::config::{
    ConfigError, MineArgs, PredictSignedArgs, PredictUnsignedArgs, RecoverArgs, SignArgs,
};
use wallet_factory::crypto::{recover_controller, sign_approval, Keypair};
use wallet_factory::{predict, Cli, Command, MineResult, Pattern, WorkerPool};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::PredictUnsigned(args) => predict_unsigned(args),
        Command::PredictSigned(args) => predict_signed(args),
        Command::Sign(args) => sign(args),
        Command::Recover(args) => recover(args),
        Command::Mine(args) => mine(args),
    }
}

fn predict_unsigned(args: PredictUnsignedArgs) {
    check_config(args.validate());

    let prediction = predict::unsigned_wallet_address(
        args.factory(),
        args.scheme,
        args.implementation(),
        &args.salt_bytes(),
    )
    .unwrap_or_else(|e| exit_with(e));

    println!("Wallet address:  {}", prediction.address);
    println!("Scheme:          {}", prediction.scheme);
    println!("Raw salt:        0x{}", hex::encode(args.salt_bytes()));
    println!("Effective salt:  0x{}", hex::encode(prediction.effective_salt));
}

fn predict_signed(args: PredictSignedArgs) {
    check_config(args.validate());

    let controller = match (args.controller(), args.signature_bytes()) {
        (Some(controller), None) => controller,
        (None, Some(signature)) => {
            recover_controller(&signature).unwrap_or_else(|e| exit_with(e))
        }
        _ => unreachable!("validate() enforces exactly one source"),
    };

    let prediction =
        predict::controller_wallet_address(args.factory(), args.implementation(), controller)
            .unwrap_or_else(|e| exit_with(e));

    println!("Controller:      {}", controller);
    println!("Wallet address:  {}", prediction.address);
    println!("Scheme:          {}", prediction.scheme);
    println!("Effective salt:  0x{}", hex::encode(prediction.effective_salt));
}

fn sign(args: SignArgs) {
    check_config(args.validate());

    let keypair = Keypair::from_secret_key(args.secret_key_bytes());
    let proof = sign_approval(&keypair);

    println!("Controller:  {}", keypair.address());
    println!("Proof:       0x{}", hex::encode(proof));
}

fn recover(args: RecoverArgs) {
    check_config(args.validate());

    let controller =
        recover_controller(&args.signature_bytes()).unwrap_or_else(|e| exit_with(e));
    println!("Controller:  {}", controller);
}

fn mine(args: MineArgs) {
    check_config(args.validate());

    let pattern = if let Some(suffix) = args.normalized_suffix() {
        Pattern::new_prefix_and_suffix(args.normalized_pattern(), suffix, args.case_sensitive)
    } else {
        Pattern::new(
            args.normalized_pattern(),
            args.effective_pattern_type(),
            args.case_sensitive,
        )
    };

    println!("Wallet Salt Miner");
    println!("=================");
    let pattern_display = if let Some(suffix) = pattern.suffix() {
        format!("{} ... {} ({})", pattern.pattern(), suffix, pattern.pattern_type())
    } else {
        format!("{} ({})", pattern.pattern(), pattern.pattern_type())
    };
    println!("Factory:        {}", args.factory());
    println!("Implementation: {}", args.implementation());
    println!("Scheme:         {}", args.scheme);
    println!("Pattern:        {}", pattern_display);
    println!("Difficulty:     {}", pattern.difficulty_description());
    println!("Workers:        {}", args.worker_count());
    println!("Target:         {} address(es)", args.count);
    println!();

    let pool = WorkerPool::new(
        args.worker_count(),
        pattern,
        args.factory(),
        args.scheme,
        args.implementation(),
    );

    let stop_flag = pool.stop_flag_clone();
    ctrlc::set_handler(move || {
        stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);
    })
    .expect("set Ctrl-C handler");

    println!("Searching... (Press Ctrl+C to stop)\n");

    let mut found = 0;
    let report_interval = Duration::from_secs(args.report_interval);

    loop {
        match pool.wait_for_result(report_interval) {
            Some(result) => {
                found += 1;
                print_result(&result, found);
                if args.count > 0 && found >= args.count {
                    println!("\nTarget reached! Found {} address(es).", found);
                    break;
                }
            }
            None => print_progress(&pool),
        }
        if pool.is_stopped() {
            println!("\nStopped by user.");
            break;
        }
    }

    println!("\n--- Final Statistics ---");
    println!("Total salts tried:  {}", format_number(pool.total_salts()));
    println!("Total matches:      {}", pool.total_matches());
    println!("Time elapsed:       {:.2}s", pool.elapsed().as_secs_f64());
    println!(
        "Average speed:      {}/s",
        format_number(pool.salts_per_second() as u64)
    );

    pool.join();
}

fn print_result(result: &MineResult, index: usize) {
    println!("=== Match #{} ===", index);
    println!("Address:         {}", result.address_checksum());
    println!("Raw salt:        0x{}", result.raw_salt_hex());
    println!("Effective salt:  0x{}", result.effective_salt_hex());
    println!("Worker:          {}", result.worker_id);
    println!();
}

fn print_progress(pool: &WorkerPool) {
    let salts = pool.total_salts();
    let rate = pool.salts_per_second();
    let elapsed = pool.elapsed().as_secs();
    println!(
        "[{:>4}s] Tried {} salts ({}/s)",
        elapsed,
        format_number(salts),
        format_number(rate as u64)
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}

fn check_config(result: Result<(), ConfigError>) {
    if let Err(e) = result {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }
}

fn exit_with(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    process::exit(1);
}
