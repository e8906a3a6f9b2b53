//! Engine bootstrap tests: file-backed database, migrations and the
//! startup backup pass

use chrono::NaiveDate;
use tempfile::TempDir;

use kitaplik::{models::NewBook, models::NewMember, AppConfig, Engine};

fn file_config(tmp: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = format!(
        "sqlite://{}",
        tmp.path().join("db").join("kitaplik.db").display()
    );
    config.database.max_connections = 1;
    config.backup.directory = tmp.path().join("yedek");
    config
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn open_creates_database_and_serves_loans() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let engine = Engine::open(file_config(&tmp)).await?;

    assert!(tmp.path().join("db").join("kitaplik.db").exists());

    let book_id = engine
        .repository
        .books
        .insert(&NewBook::new("B001", "Çalıkuşu"))
        .await?;
    let member_id = engine
        .repository
        .members
        .insert(&NewMember::new("101", "Ayşe", "Yılmaz"))
        .await?;

    let loan = engine
        .services
        .loans
        .create_loan(member_id, book_id, date(2024, 1, 1))
        .await?;
    assert_eq!(loan.due_date, date(2024, 1, 16));

    // The shell renders loans from their serialized form.
    let rendered = serde_json::to_value(&loan)?;
    assert_eq!(rendered["due_date"], "2024-01-16");
    assert!(rendered["return_date"].is_null());
    Ok(())
}

#[tokio::test]
async fn reopening_snapshots_the_previous_session() {
    let tmp = TempDir::new().unwrap();
    let config = file_config(&tmp);

    // First open: no database file yet, so no snapshot is taken.
    {
        let engine = Engine::open(config.clone()).await.unwrap();
        engine
            .repository
            .books
            .insert(&NewBook::new("B001", "Serenad"))
            .await
            .unwrap();
    }
    let backups = tmp.path().join("yedek");
    let count = |dir: &std::path::Path| {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    };
    assert_eq!(count(&backups), 0);

    // Second open backs up the file left by the first session.
    let engine = Engine::open(config).await.unwrap();
    assert_eq!(count(&backups), 1);

    // The catalog survived the restart.
    let book = engine
        .repository
        .books
        .get_by_barcode("B001")
        .await
        .unwrap();
    assert!(book.is_some());

    // On-demand snapshots work too, and pruning respects the retention cap.
    // Snapshot names have second resolution, so step past the startup one.
    std::thread::sleep(std::time::Duration::from_millis(1100));
    engine.services.backup.snapshot().unwrap();
    let before = count(&backups);
    assert!(before >= 2);
    assert_eq!(engine.services.backup.prune(1).unwrap(), before - 1);
    assert_eq!(count(&backups), 1);
}
