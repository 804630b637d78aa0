use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipe_text::ingredient_model::{IngredientInfo, Recipe, RecipeDocument};
use recipe_text::quantity_scaler::scale_ingredients;
use recipe_text::recipe_config::AppConfig;
use recipe_text::recipe_errors::RecipeError;
use recipe_text::recipe_integration::{
    format_annotated_text, format_recipe, format_scaled_ingredients, import_recipe,
    JsonDocumentExtractor, RecipeSource,
};
use recipe_text::recipe_store::{JsonDirRecipeStore, RecipeStore};
use recipe_text::text_processing::TextAnnotator;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scale and annotate recipes", long_about = None)]
struct Cli {
    /// Recipe store directory (overrides RECIPE_STORE_DIR)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ingredients of a recipe document scaled to a serving count
    Scale {
        /// Path to a recipe document (JSON)
        file: PathBuf,
        /// Target serving count
        #[arg(short, long)]
        servings: u32,
        /// Serving count of the document, when it does not state one
        #[arg(long)]
        from: Option<u32>,
    },
    /// Highlight quantities, times and ingredients in a piece of text
    Annotate {
        /// Text to annotate
        text: String,
        /// Ingredient name to look for (repeatable)
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        /// Print the segments as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import a recipe document (JSON) into the store
    Import {
        /// Path to a recipe document (JSON)
        file: PathBuf,
    },
    /// Show a stored recipe with annotated steps
    Show {
        /// Recipe id
        id: String,
        /// Scale to this serving count
        #[arg(short, long)]
        servings: Option<u32>,
    },
    /// List stored recipes
    List,
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
            .init();
    }
}

fn read_document(path: &Path) -> Result<RecipeDocument> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe document {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to decode recipe document {}", path.display()))
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(dir) = cli.store_dir {
        config.store_dir = dir;
    }

    init_logging(&config);
    info!(store_dir = %config.store_dir.display(), "Starting recipe-text");

    let annotator = TextAnnotator::with_config(config.annotator.clone())?;

    match cli.command {
        Command::Scale { file, servings, from } => {
            let recipe = Recipe::from_document(read_document(&file)?)?;
            let original = recipe
                .serving_count()
                .or(from)
                .unwrap_or(config.default_servings);
            let groups = scale_ingredients(&recipe.ingredients, original, servings);
            print!("{}", format_scaled_ingredients(&groups));
        }
        Command::Annotate { text, ingredients, json } => {
            let infos: Vec<IngredientInfo> = ingredients.iter().map(|name| IngredientInfo::named(name)).collect();
            let annotated = annotator.annotate(&text, &infos);
            if json {
                println!("{}", serde_json::to_string_pretty(&annotated)?);
            } else {
                println!("{}", format_annotated_text(&annotated));
            }
        }
        Command::Import { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read recipe document {}", file.display()))?;
            let mut store = JsonDirRecipeStore::open(&config.store_dir)?;
            let id = import_recipe(&JsonDocumentExtractor, &mut store, &RecipeSource::Text(json))?;
            println!("{id}");
        }
        Command::Show { id, servings } => {
            let store = JsonDirRecipeStore::open(&config.store_dir)?;
            let Some(recipe) = store.load(&id)? else {
                return Err(RecipeError::NotFound(id).into());
            };
            print!("{}", format_recipe(&recipe, servings, config.default_servings, &annotator));
        }
        Command::List => {
            let store = JsonDirRecipeStore::open(&config.store_dir)?;
            for id in store.list_ids()? {
                match store.load(&id)? {
                    Some(recipe) => println!("{id}  {}", recipe.title),
                    None => println!("{id}"),
                }
            }
        }
    }

    Ok(())
}
