use fiscus::db;
use fiscus::error::Result;
use fiscus::settings::{self, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = settings::load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    std::fs::create_dir_all(&settings.data_dir)?;
    settings::save_settings(&settings)?;

    let db_path = std::path::Path::new(&settings.data_dir).join("fiscus.db");
    let conn = db::get_connection(&db_path)?;
    db::init_db(&conn)?;

    println!("Initialized warehouse at {}", db_path.display());
    Ok(())
}
