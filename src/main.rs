mod cli;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Demo => cli::demo::run(),
        Commands::Download {
            account_type,
            account_level,
            fy,
            quarter,
            period,
            agency,
            federal_account,
            budget_function,
            budget_subfunction,
            def_codes,
            format,
            output,
            limit,
            page,
            sort,
            order,
        } => cli::download::run(cli::download::DownloadArgs {
            account_type,
            account_level,
            fy,
            quarter,
            period,
            agency,
            federal_account,
            budget_function,
            budget_subfunction,
            def_codes,
            format,
            output,
            limit,
            page,
            sort,
            order,
        }),
        Commands::Periods { fy } => cli::periods::run(fy),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
