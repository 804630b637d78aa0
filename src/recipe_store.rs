//! # Recipe Store Module
//!
//! Persistence for normalized recipes. Every saved recipe gets a generated UUID v4
//! id. Two stores are provided: an in-memory map for tests and short-lived
//! sessions, and a directory holding one pretty-printed `<id>.json` file per recipe.

use crate::ingredient_model::Recipe;
use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Storage backend for recipes
pub trait RecipeStore {
    /// Store a new recipe and return its generated id
    fn save(&mut self, recipe: &Recipe) -> Result<String>;

    /// Read a recipe by id
    fn load(&self, id: &str) -> Result<Option<Recipe>>;

    /// Remove a recipe; returns whether it existed
    fn delete(&mut self, id: &str) -> Result<bool>;

    /// Every stored id, sorted
    fn list_ids(&self) -> Result<Vec<String>>;
}

fn new_recipe_id() -> String {
    Uuid::new_v4().to_string()
}

/// Ids become file names, so only accept the characters a UUID can contain
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        bail!("Invalid recipe id '{}'", id);
    }
    Ok(())
}

/// Recipes kept in memory
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    recipes: BTreeMap<String, Recipe>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeStore for InMemoryRecipeStore {
    fn save(&mut self, recipe: &Recipe) -> Result<String> {
        let id = new_recipe_id();
        debug!(recipe_id = %id, title = %recipe.title, "Saving recipe in memory");
        self.recipes.insert(id.clone(), recipe.clone());
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Option<Recipe>> {
        Ok(self.recipes.get(id).cloned())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        Ok(self.recipes.remove(id).is_some())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        Ok(self.recipes.keys().cloned().collect())
    }
}

/// Recipes stored as `<id>.json` files in a directory
#[derive(Debug, Clone)]
pub struct JsonDirRecipeStore {
    dir: PathBuf,
}

impl JsonDirRecipeStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create recipe directory {}", dir.display()))?;
        info!(dir = %dir.display(), "Opened JSON recipe store");
        Ok(Self { dir })
    }

    /// Directory holding the recipe files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl RecipeStore for JsonDirRecipeStore {
    fn save(&mut self, recipe: &Recipe) -> Result<String> {
        let id = new_recipe_id();
        let path = self.path_for(&id)?;
        let json = serde_json::to_string_pretty(recipe).context("Failed to serialize recipe")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write recipe file {}", path.display()))?;

        info!(recipe_id = %id, title = %recipe.title, "Recipe saved");
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Option<Recipe>> {
        let path = self.path_for(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(recipe_id = %id, "No recipe file found");
                return Ok(None);
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read recipe file {}", path.display()))
            }
        };

        let recipe = serde_json::from_str(&json)
            .with_context(|| format!("Failed to decode recipe file {}", path.display()))?;
        Ok(Some(recipe))
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(recipe_id = %id, "Recipe deleted");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to delete recipe file {}", path.display()))
            }
        }
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list recipe directory {}", self.dir.display()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.context("Failed to read directory entry")?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) if validate_id(stem).is_ok() => ids.push(stem.to_string()),
                _ => warn!(path = %path.display(), "Skipping unexpected file in recipe directory"),
            }
        }
        ids.sort();
        Ok(ids)
    }
}
