//! End-to-end ingestion over HTTP against a mock almanac

mod helpers;

use helpers::{index_page, season_page};
use standings_ingest::load::read_standings;
use standings_ingest::pipeline::{import_csv, StandingsPipeline};
use standings_ingest::{csv_io, ExtractionStrategy, IngestConfig};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn config(server: &MockServer, dir: &std::path::Path) -> IngestConfig {
    IngestConfig::builder()
        .index_url(format!("{}/yearmenu.shtml", server.uri()))
        .load_timeout_secs(1)
        .request_delay_ms(0)
        .show_progress(false)
        .csv_path(Some(dir.join("standings.csv")))
        .database_path(dir.join("mlb_history.db"))
        .build()
}

#[tokio::test]
async fn test_run_scrapes_writes_csv_and_loads() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/yearmenu.shtml", index_page(&[2000, 2001])).await;
    mount_page(
        &server,
        "/yearly/yr2000a.shtml",
        season_page(
            2000,
            &[
                &["New York Yankees", "87", "74", ".540", "-", "$92,938,260"],
                &["Boston Red Sox", "85", "77", ".525", "2½", "$77,940,333"],
            ],
        ),
    )
    .await;
    mount_page(
        &server,
        "/yearly/yr2001a.shtml",
        season_page(
            2001,
            &[&["Seattle Mariners", "116", "46", ".716", "-", "$74,720,834"]],
        ),
    )
    .await;

    let config = config(&server, dir.path());
    let pipeline = StandingsPipeline::with_http(config.clone()).unwrap();
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.scrape.seasons_discovered, 2);
    assert_eq!(stats.scrape.seasons_scraped, 2);
    assert_eq!(stats.rows_loaded(), 3);

    let raw = csv_io::read_raw_csv(&dir.path().join("standings.csv")).unwrap();
    assert_eq!(raw.len(), 3);
    assert_eq!(raw[1].gb, "2½");
    assert_eq!(raw[2].payroll, "$74,720,834");

    let conn = rusqlite::Connection::open(&config.database_path).unwrap();
    let loaded = read_standings(&conn, &config.table_name).unwrap();
    assert_eq!(loaded[1].team, "Boston Red Sox");
    assert_eq!(loaded[1].gb, Some(2.5));
    assert_eq!(loaded[2].year, 2001);
    assert_eq!(loaded[2].wins, 116);
    assert!((loaded[2].wp.unwrap() - 0.716).abs() < 1e-6);
}

#[tokio::test]
async fn test_slow_and_missing_seasons_are_skipped() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/yearmenu.shtml", index_page(&[2010, 2011, 2012])).await;
    Mock::given(method("GET"))
        .and(path("/yearly/yr2010a.shtml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(season_page(2010, &[]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/yearly/yr2011a.shtml",
        season_page(
            2011,
            &[&["New York Yankees", "97", "65", ".599", "-", "$202,689,028"]],
        ),
    )
    .await;
    // 2012 is not mounted: wiremock answers 404

    let pipeline = StandingsPipeline::with_http(config(&server, dir.path())).unwrap();
    let outcome = pipeline.scrape().await.unwrap();

    assert_eq!(outcome.stats.seasons_failed, 2);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].year, 2011);
}

#[tokio::test]
async fn test_roster_rows_strategy() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/yearmenu.shtml", index_page(&[2005])).await;
    mount_page(
        &server,
        "/yearly/yr2005a.shtml",
        season_page(
            2005,
            &[
                &["Chicago White Sox", "99", "63", ".611", "-", "$75,178,000"],
                &["Cleveland Indians", "93", "69", ".574", "6"],
            ],
        ),
    )
    .await;

    let config = IngestConfig {
        strategy: ExtractionStrategy::RosterRows,
        ..config(&server, dir.path())
    };
    let pipeline = StandingsPipeline::with_http(config).unwrap();
    let outcome = pipeline.scrape().await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].team, "Chicago White Sox");
}

#[test]
fn test_import_from_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("standings.csv");
    std::fs::write(
        &csv_path,
        "Year,Team,Wins,Losses,WP,GB,Payroll\n\
         2000,Chicago White Sox,95,67,.586,-,\"$31,133,500\"\n\
         2000,Cleveland Indians,90,72,.556,5,\"$75,880,771\"\n\
         bad,Detroit Tigers,79,83,.488,16,\n",
    )
    .unwrap();

    let config = IngestConfig::builder()
        .csv_path(Some(csv_path))
        .database_path(dir.path().join("mlb_history.db"))
        .build();

    let stats = import_csv(&config).unwrap();
    assert_eq!(stats.rows_read, 2);
    assert_eq!(stats.rows_loaded, 2);

    let conn = rusqlite::Connection::open(&config.database_path).unwrap();
    let sql_type: String = conn
        .query_row(
            "SELECT type FROM pragma_table_info('team_standings') WHERE name = 'GB'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(sql_type, "INTEGER");
}
