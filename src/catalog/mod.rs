//! Content catalog: the model roster, the joke pool, and the derived
//! category index.
//!
//! Everything here is loaded once at startup and immutable afterwards; the
//! running service only ever reads it. A category is *eligible* for
//! matchmaking when at least two roster models have at least one joke in it.

pub mod error;


pub use error::CatalogError;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

/// Joke pool: model identifier → category → joke texts.
pub type JokePool = HashMap<String, HashMap<String, Vec<String>>>;

/// Immutable content catalog built from the startup inputs.
#[derive(Debug)]
pub struct Catalog {
    models: Vec<String>,
    jokes: JokePool,
    index: CategoryIndex,
}

impl Catalog {
    /// Loads the roster CSV and joke catalog JSON, then derives the category
    /// index.
    pub fn load(models_path: &Path, jokes_path: &Path) -> Result<Self, CatalogError> {
        let models = load_models(models_path)?;
        let jokes = load_jokes(jokes_path)?;
        let index = CategoryIndex::build(&models, &jokes);

        info!(
            models = models.len(),
            categories = index.len(),
            "content catalog loaded"
        );

        Ok(Self {
            models,
            jokes,
            index,
        })
    }

    /// Builds a catalog from in-memory inputs.
    pub fn from_parts(models: Vec<String>, jokes: JokePool) -> Self {
        let index = CategoryIndex::build(&models, &jokes);
        Self {
            models,
            jokes,
            index,
        }
    }

    /// The model roster, in file order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// The derived category index.
    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    /// Jokes for `model` in `category`, if any.
    pub fn jokes_for(&self, model: &str, category: &str) -> Option<&[String]> {
        self.jokes
            .get(model)
            .and_then(|by_category| by_category.get(category))
            .map(Vec::as_slice)
    }
}

/// Category → models with at least one joke in that category.
///
/// Only categories with two or more eligible models are kept; a category you
/// cannot pair is useless for matchmaking.
#[derive(Debug, Default)]
pub struct CategoryIndex {
    entries: HashMap<String, Vec<String>>,
    // Stable iteration order for uniform random choice.
    categories: Vec<String>,
}

impl CategoryIndex {
    fn build(models: &[String], jokes: &JokePool) -> Self {
        let mut entries: HashMap<String, Vec<String>> = HashMap::new();

        for model in models {
            let Some(by_category) = jokes.get(model) else {
                continue;
            };
            for (category, pool) in by_category {
                if !pool.is_empty() {
                    entries.entry(category.clone()).or_default().push(model.clone());
                }
            }
        }

        entries.retain(|_, eligible| eligible.len() >= 2);

        let mut categories: Vec<String> = entries.keys().cloned().collect();
        categories.sort();

        Self {
            entries,
            categories,
        }
    }

    /// Eligible category names, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Models eligible in `category` (always ≥ 2 entries when present).
    pub fn models_in(&self, category: &str) -> Option<&[String]> {
        self.entries.get(category).map(Vec::as_slice)
    }

    /// Number of eligible categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` if no category has two eligible models.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn load_models(path: &Path) -> Result<Vec<String>, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // One model per row; only the first CSV column matters.
    let models: Vec<String> = raw
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    if models.is_empty() {
        return Err(CatalogError::EmptyRoster {
            path: path.to_path_buf(),
        });
    }

    Ok(models)
}

fn load_jokes(path: &Path) -> Result<JokePool, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
