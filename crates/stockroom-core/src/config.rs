//! Storage configuration.
//!
//! Each application keeps its collections under one data directory. The
//! directory and every file name can be overridden from the environment:
//!
//! | App       | Directory var  | Default            |
//! |-----------|----------------|--------------------|
//! | inventory | `INV_DATA_DIR` | `./data/inventory` |
//! | library   | `LIB_DATA_DIR` | `./data/library`   |
//! | school    | `SCH_DATA_DIR` | `./data/school`    |
//!
//! A file override may be a bare name or a path; relative paths are taken
//! from the data directory. A leading `~` expands to the home directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Root directory for default data directories.
const DATA_ROOT: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum App {
    Inventory,
    Library,
    School,
}

impl App {
    pub const ALL: [App; 3] = [App::Inventory, App::Library, App::School];

    pub fn name(&self) -> &'static str {
        match self {
            App::Inventory => "inventory",
            App::Library => "library",
            App::School => "school",
        }
    }

    pub fn data_dir_var(&self) -> &'static str {
        match self {
            App::Inventory => "INV_DATA_DIR",
            App::Library => "LIB_DATA_DIR",
            App::School => "SCH_DATA_DIR",
        }
    }

    pub fn default_data_dir(&self) -> PathBuf {
        Path::new(".").join(DATA_ROOT).join(self.name())
    }

    pub fn collections(&self) -> &'static [Collection] {
        match self {
            App::Inventory => &[Collection::Products, Collection::ProductChanges],
            App::Library => &[Collection::LibraryStudents, Collection::Books, Collection::Loans],
            App::School => &[
                Collection::SchoolStudents,
                Collection::Courses,
                Collection::Enrollments,
            ],
        }
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for App {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        App::ALL
            .into_iter()
            .find(|app| app.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown application: {}", s))
    }
}

/// One persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    ProductChanges,
    LibraryStudents,
    Books,
    Loans,
    SchoolStudents,
    Courses,
    Enrollments,
}

impl Collection {
    pub fn file_var(&self) -> &'static str {
        match self {
            Collection::Products => "INV_PRODUCTS_FILE",
            Collection::ProductChanges => "INV_CHANGES_FILE",
            Collection::LibraryStudents => "LIB_STUDENTS_FILE",
            Collection::Books => "LIB_BOOKS_FILE",
            Collection::Loans => "LIB_LOANS_FILE",
            Collection::SchoolStudents => "SCH_STUDENTS_FILE",
            Collection::Courses => "SCH_COURSES_FILE",
            Collection::Enrollments => "SCH_ENROLLMENTS_FILE",
        }
    }

    pub fn default_file(&self) -> &'static str {
        match self {
            Collection::Products => "products.json",
            Collection::ProductChanges => "product_changes.json",
            Collection::LibraryStudents | Collection::SchoolStudents => "students.json",
            Collection::Books => "books.json",
            Collection::Loans => "loans.json",
            Collection::Courses => "courses.json",
            Collection::Enrollments => "enrollments.json",
        }
    }
}

/// Resolved file locations for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    app: App,
    data_dir: PathBuf,
    files: Vec<(Collection, PathBuf)>,
}

impl StorageConfig {
    /// Resolve from the process environment.
    pub fn from_env(app: App) -> Self {
        Self::from_lookup(app, |key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` in place of the environment. Empty values
    /// count as unset.
    pub fn from_lookup(app: App, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = get(app.data_dir_var())
            .map(|dir| expand_home(&dir))
            .unwrap_or_else(|| app.default_data_dir());

        let files = app
            .collections()
            .iter()
            .map(|collection| {
                let file = get(collection.file_var())
                    .map(|file| expand_home(&file))
                    .unwrap_or_else(|| PathBuf::from(collection.default_file()));
                (*collection, data_dir.join(file))
            })
            .collect();

        Self { app, data_dir, files }
    }

    /// Fixed directory with default file names.
    pub fn in_dir(app: App, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let files = app
            .collections()
            .iter()
            .map(|collection| (*collection, data_dir.join(collection.default_file())))
            .collect();
        Self { app, data_dir, files }
    }

    pub fn app(&self) -> App {
        self.app
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File for `collection`. Collections of another app fall back to their
    /// default name inside this data directory.
    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.files
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, path)| path.clone())
            .unwrap_or_else(|| self.data_dir.join(collection.default_file()))
    }
}

fn expand_home(value: &str) -> PathBuf {
    match value.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(value),
        },
        _ => PathBuf::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorageConfig::from_lookup(App::Inventory, lookup(&[]));
        assert_eq!(config.data_dir(), Path::new("./data/inventory"));
        assert_eq!(
            config.path_for(Collection::Products),
            PathBuf::from("./data/inventory/products.json")
        );
        assert_eq!(
            config.path_for(Collection::ProductChanges),
            PathBuf::from("./data/inventory/product_changes.json")
        );
    }

    #[test]
    fn test_overrides() {
        let config = StorageConfig::from_lookup(
            App::Library,
            lookup(&[("LIB_DATA_DIR", "/srv/lib"), ("LIB_LOANS_FILE", "prestamos.json")]),
        );
        assert_eq!(config.path_for(Collection::Loans), PathBuf::from("/srv/lib/prestamos.json"));
        assert_eq!(config.path_for(Collection::Books), PathBuf::from("/srv/lib/books.json"));
    }

    #[test]
    fn test_absolute_file_override_ignores_dir() {
        let config = StorageConfig::from_lookup(
            App::School,
            lookup(&[("SCH_COURSES_FILE", "/tmp/courses.json")]),
        );
        assert_eq!(config.path_for(Collection::Courses), PathBuf::from("/tmp/courses.json"));
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let config = StorageConfig::from_lookup(App::School, lookup(&[("SCH_DATA_DIR", "  ")]));
        assert_eq!(config.data_dir(), Path::new("./data/school"));
    }

    #[test]
    fn test_home_expansion() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_home("~/stock"), home.join("stock"));
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("~other/x"), PathBuf::from("~other/x"));
        assert_eq!(expand_home("data/~"), PathBuf::from("data/~"));
    }

    #[test]
    fn test_app_from_str() {
        assert_eq!("Library".parse::<App>().unwrap(), App::Library);
        assert!("garage".parse::<App>().is_err());
    }

    #[test]
    fn test_in_dir_uses_default_names() {
        let config = StorageConfig::in_dir(App::School, "/x");
        assert_eq!(config.path_for(Collection::Enrollments), PathBuf::from("/x/enrollments.json"));
        assert_eq!(config.path_for(Collection::Books), PathBuf::from("/x/books.json"));
    }
}
