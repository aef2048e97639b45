use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufRead};
use std::path::Path;
use walkdir::WalkDir;

/// Expected outcome of running `algorithm` on a board. A cost and step count of -1 mean
/// the goal cannot be reached.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub id: u32,
    pub algorithm: String,
    pub cost: i64,
    pub steps: i64,
}

impl Scenario {
    pub fn reachable(&self) -> bool {
        self.cost >= 0
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    pub name: String,
    pub text: String,
    pub scenarios: Vec<Scenario>,
}

fn load_board(root: &Path, name: &str) -> Board {
    let text = fs::read_to_string(root.join("boards").join(format!("{name}.txt")))
        .expect("Could not read board file");

    let file = File::open(root.join("scenarios").join(format!("{name}.scen")))
        .expect("Could not open scenario file");

    // Create a buffer reader to read lines
    let reader = io::BufReader::new(file);
    let mut lines = reader.lines();

    // Skip the version line
    lines.next();

    let remaining_data = lines
        .collect::<Result<Vec<_>, _>>()
        .expect("Could not read scenario lines")
        .join("\n");

    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(remaining_data.as_bytes());

    let scenarios = csv_reader
        .deserialize()
        .map(|result| result.expect("Could not parse scenario record"))
        .collect();

    Board {
        name: name.to_owned(),
        text,
        scenarios,
    }
}

/// Names of all boards under `root/boards`, sorted.
pub fn get_board_names(root: &Path) -> Vec<String> {
    let boards = root.join("boards");
    let mut names = Vec::new();
    for entry in WalkDir::new(&boards).min_depth(1).max_depth(1) {
        let entry = entry.expect("Could not get dir entry");
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
    }
    names.sort();
    names
}

pub fn get_board(root: &Path, name: &str) -> Board {
    if get_board_names(root).iter().any(|n| n == name) {
        load_board(root, name)
    } else {
        panic!("Could not load board {name}!");
    }
}

pub fn get_boards(root: &Path) -> Vec<Board> {
    get_board_names(root)
        .iter()
        .map(|name| load_board(root, name))
        .collect()
}
