mod config;
mod db;
mod forecast;
mod import;
mod logging;
mod models;
mod run;
mod service;
mod summary;

use anyhow::Result;
use std::path::PathBuf;

fn main() -> Result<()> {
    logging::init();
    let args: Vec<String> = std::env::args().collect();

    let dirs = config::Dirs::discover()?;
    let config = config::Config::load(&dirs.config_file)?;
    let env_db = std::env::var_os(config::DB_ENV).map(PathBuf::from);
    let db_path = config.resolve_db_path(env_db, &dirs.data_dir);
    let mut db = db::Database::open(&db_path)?;

    run::as_cli(&args, &mut db, &config, &db_path)
}
