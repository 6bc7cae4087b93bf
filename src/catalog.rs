use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::error::Error;

static CATALOG_DIR: Dir = include_dir!("src/objects");

/// Points awarded per object are drawn uniformly from this range.
pub const MIN_POINTS: u32 = 50;
pub const MAX_POINTS: u32 = 99;

/// One item the player has to photograph during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetObject {
    pub id: u32,
    pub name: String,
    pub found: bool,
    pub points: u32,
}

/// One catalog entry: canonical object name plus the curated synonym set
/// used to bridge classifier vocabulary and object names.
#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct CatalogEntry {
    pub name: String,
    pub synonyms: Vec<String>,
}

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct Catalog {
    pub name: String,
    pub size: u32,
    pub objects: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(file_name: String) -> Self {
        read_catalog_from_file(format!("{file_name}.json")).unwrap()
    }

    /// Pick `count` distinct objects uniformly at random, assign sequential
    /// ids starting at 1 and random point values. All targets start unfound.
    pub fn generate_targets(&self, count: usize) -> Vec<TargetObject> {
        let mut rng = rand::thread_rng();
        let mut entries: Vec<&CatalogEntry> = self.objects.iter().collect();
        entries.shuffle(&mut rng);

        entries
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(i, entry)| TargetObject {
                id: i as u32 + 1,
                name: entry.name.clone(),
                found: false,
                points: rng.gen_range(MIN_POINTS..=MAX_POINTS),
            })
            .collect()
    }

    /// Synonym set for a canonical name. Objects without a curated entry
    /// match on their own name only.
    pub fn synonyms(&self, name: &str) -> Vec<String> {
        let lowered = name.to_lowercase();
        self.objects
            .iter()
            .find(|entry| entry.name == lowered)
            .map(|entry| entry.synonyms.clone())
            .unwrap_or_else(|| vec![lowered])
    }
}

fn read_catalog_from_file(file_name: String) -> Result<Catalog, Box<dyn Error>> {
    let file = CATALOG_DIR
        .get_file(file_name)
        .expect("Catalog file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let catalog = from_str(file_as_str).expect("Unable to deserialize catalog json");

    Ok(catalog)
}
