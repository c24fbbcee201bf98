use anchor_config::{logging, ConfigStore, Node};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Database {
    host: String,
    port: u16,
}

fn main() -> Result<(), anchor_config::Error> {
    logging::init()?;

    let mut store = ConfigStore::new();
    store.add(Some(Path::new("demos/config/config.yml")))?;

    // Strict: every segment must be defined.
    println!("App: {:?}", store.get("app.name")?.as_str());
    if let Err(e) = store.get("app.debug") {
        println!("Strict lookup: {e}");
    }

    // Lenient: missing members come back as Node::Absent.
    if let Some(view) = store.view() {
        let fallback = Node::from("unset");
        println!("Keys: {:?}", view.keys());
        println!("Region: {:?}", view.fetch("region", &fallback).as_str());
        println!(
            "First replica: {:?}",
            view.get("database").get("replicas").at(0).get("host").as_str()
        );
    }

    let db: Database = store.extract("database")?;
    println!("Database: {db:?}");

    Ok(())
}
