use hashbrown::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::*;

/// Key-value storage the progress store writes through.
///
/// Implementations report failures, the store decides to shrug them off.
pub trait Persistence {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keeps everything in process memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryPersistence {
    values: HashMap<String, String>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Clone, Debug, PartialEq)]
pub struct FilePersistence {
    dir: PathBuf,
}

impl FilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(file_name).with_extension("json")
    }
}

impl Persistence for FilePersistence {
    fn load(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("Could not read {}: {}", path.display(), err);
                None
            }
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, value))
            .map_err(|err| {
                log::error!("Could not write {}: {}", path.display(), err);
                GameError::Persistence
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trips_values() {
        let mut persistence = MemoryPersistence::new();
        assert_eq!(persistence.load("rowswap:profile"), None);
        persistence.save("rowswap:profile", "{}").unwrap();
        assert_eq!(persistence.load("rowswap:profile").as_deref(), Some("{}"));
    }

    #[test]
    fn file_names_are_sanitized() {
        let persistence = FilePersistence::new("/tmp/rowswap");
        assert_eq!(
            persistence.path_for("rowswap:highscores"),
            PathBuf::from("/tmp/rowswap/rowswap_highscores.json")
        );
    }

    #[test]
    fn file_round_trips_values() {
        let dir = std::env::temp_dir().join(format!("rowswap-test-{}", std::process::id()));
        let mut persistence = FilePersistence::new(&dir);

        assert_eq!(persistence.load("rowswap:progress"), None);
        persistence.save("rowswap:progress", "[1,2]").unwrap();
        assert_eq!(persistence.load("rowswap:progress").as_deref(), Some("[1,2]"));

        let _ = fs::remove_dir_all(dir);
    }
}
