//  Copyright (c) 2025 The splat_ply developers

use clap::Parser;

use splat_ply::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_target(false)
        .init();

    let args = Cli::parse();
    splat_ply::convert(args.input.as_deref(), args.output.as_deref(), args.ply_format());
}
