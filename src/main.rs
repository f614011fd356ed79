use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = hypertile::config::Config::parse();
    hypertile::render::run(&cfg)
}
