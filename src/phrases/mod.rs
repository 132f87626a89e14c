use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

static PHRASE_DIR: Dir = include_dir!("src/phrases");

/// A named list of practice strings, embedded at build time. Each round
/// walks the whole list in order; the first entry is a spaceless warm-up
/// drill that the word-throughput metric skips.
#[derive(Deserialize, Clone, Debug)]
pub struct PhraseSet {
    pub name: String,
    pub size: u32,
    pub phrases: Vec<String>,
}

impl PhraseSet {
    pub fn load(set_name: &str) -> Self {
        Self::try_load(set_name).expect("Phrase set not found")
    }

    pub fn try_load(set_name: &str) -> Option<Self> {
        let file = PHRASE_DIR.get_file(format!("{set_name}.json"))?;
        let file_as_str = file
            .contents_utf8()
            .expect("Unable to interpret phrase file as a string");
        Some(from_str(file_as_str).expect("Unable to deserialize phrase set json"))
    }
}
