use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use recipe_scaler::catalog::{filter_recipes, find_recipe, load_catalog};
use recipe_scaler::config::RecipeConfig;
use recipe_scaler::ingredient_aggregator::IngredientAggregator;
use recipe_scaler::ingredient_model::Recipe;
use recipe_scaler::quantity_format::format_quantity_for_display;
use recipe_scaler::scaling::{round2, ScalingStore};
use recipe_scaler::shopping_list::{export_payload, format_shopping_note, task_titles, ShoppingListBuilder};
use std::collections::HashMap;
use std::path::PathBuf;

/// recipe-scaler - scale recipes and build shopping lists
#[derive(Parser)]
#[command(name = "recipe-scaler")]
#[command(about = "Scale recipes and build shopping lists from a JSON recipe collection", long_about = None)]
struct Cli {
    /// Directory holding the recipe JSON files
    #[arg(long, global = true, env = "RECIPES_DIR", default_value = "recipes")]
    dir: PathBuf,

    /// Language of notes and category labels (overrides RECIPE_LANGUAGE)
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes, newest first
    List {
        /// Text to search for in names, descriptions, ingredients and steps
        #[arg(long, default_value = "")]
        search: String,

        /// Only recipes of this category ("all" for every category)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a recipe's ingredients, scaled
    Show {
        /// Recipe name or slug
        recipe: String,

        /// Number of servings to scale to
        #[arg(long, conflicts_with = "factor")]
        servings: Option<f64>,

        /// Scale factor (0.25 to 4)
        #[arg(long)]
        factor: Option<f64>,
    },
    /// Build a combined shopping list
    Shop {
        /// Recipe names or slugs
        #[arg(required = true)]
        recipes: Vec<String>,

        /// Scale factor for one recipe, as NAME=FACTOR (repeatable)
        #[arg(long = "factor", value_parser = parse_recipe_factor)]
        factors: Vec<(String, f64)>,

        /// Print one task title per line
        #[arg(long, conflicts_with = "json")]
        tasks: bool,

        /// Print the export payload as JSON
        #[arg(long)]
        json: bool,

        /// Title of the exported list
        #[arg(long)]
        title: Option<String>,
    },
}

fn parse_recipe_factor(value: &str) -> Result<(String, f64), String> {
    let (name, factor) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=FACTOR, got '{value}'"))?;
    let factor = factor
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{factor}' is not a number"))?;
    Ok((name.trim().to_string(), factor))
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let mut config = RecipeConfig::from_env().context("Invalid recipe configuration")?;
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    debug!("Using configuration: {:?}", config);

    let recipes = load_catalog(&cli.dir)
        .with_context(|| format!("Failed to load recipes from {}", cli.dir.display()))?;
    info!("Catalog holds {} recipes", recipes.len());

    match cli.command {
        Commands::List { search, category } => list_command(&recipes, &search, category.as_deref()),
        Commands::Show {
            recipe,
            servings,
            factor,
        } => show_command(config, &recipes, &recipe, servings, factor),
        Commands::Shop {
            recipes: names,
            factors,
            tasks,
            json,
            title,
        } => shop_command(config, &recipes, &names, &factors, tasks, json, title.as_deref()),
    }
}

fn lookup<'a>(recipes: &'a [Recipe], name_or_slug: &str) -> Result<&'a Recipe> {
    find_recipe(recipes, name_or_slug).ok_or_else(|| anyhow!("Recipe not found: {name_or_slug}"))
}

fn list_command(recipes: &[Recipe], search: &str, category: Option<&str>) -> Result<()> {
    let matches = filter_recipes(recipes, search, category);
    if matches.is_empty() {
        println!("No recipes found.");
        return Ok(());
    }
    for recipe in matches {
        let category = recipe.category.as_deref().unwrap_or("-");
        let slug = recipe.slug.as_deref().unwrap_or("");
        println!("{} [{}] ({})", recipe.name, category, slug);
    }
    Ok(())
}

fn show_command(
    config: RecipeConfig,
    recipes: &[Recipe],
    name: &str,
    servings: Option<f64>,
    factor: Option<f64>,
) -> Result<()> {
    let recipe = lookup(recipes, name)?;

    let mut store = ScalingStore::with_config(config.clone());
    store.init_recipe(recipe);
    if let Some(servings) = servings {
        store.set_servings(&recipe.name, servings);
    } else if let Some(factor) = factor {
        store.set_factor(&recipe.name, factor);
    }
    let scale_factor = store.scale_factor(&recipe.name);

    println!("{}", recipe.name);
    if let Some(state) = store.state(&recipe.name) {
        println!(
            "{} {} (x{})",
            format_quantity_for_display(state.current_servings),
            state.unit,
            round2(state.scale_factor)
        );
        if let Some(note) = &state.note {
            println!("{note}");
        }
    }
    println!();

    let aggregator = IngredientAggregator::with_config(config);
    let mut current_section: Vec<String> = Vec::new();
    for ingredient in aggregator.aggregate(&recipe.ingredients, scale_factor) {
        if ingredient.subsection_path != current_section {
            current_section = ingredient.subsection_path.clone();
            if !current_section.is_empty() {
                println!("\n{}:", current_section.join(" / "));
            }
        }
        println!("- {}", ingredient.display_text);
        if let Some(label) = &ingredient.warning_label {
            println!("    ⚠️ {label}");
        }
        if let Some(note) = &ingredient.note {
            println!("    {note}");
        }
    }
    Ok(())
}

fn shop_command(
    config: RecipeConfig,
    recipes: &[Recipe],
    names: &[String],
    factors: &[(String, f64)],
    tasks: bool,
    json: bool,
    title: Option<&str>,
) -> Result<()> {
    let selected: Vec<Recipe> = names
        .iter()
        .map(|name| lookup(recipes, name).cloned())
        .collect::<Result<_>>()?;

    let mut scale_factors: HashMap<String, f64> = HashMap::new();
    for (name, factor) in factors {
        let recipe = lookup(recipes, name)?;
        scale_factors.insert(recipe.name.clone(), config.clamp_scale_factor(*factor));
    }

    let list = ShoppingListBuilder::with_config(config).build(&selected, &scale_factors);

    if json {
        let payload = export_payload(&list, title);
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("Failed to serialize shopping list")?
        );
    } else if tasks {
        for line in task_titles(&list) {
            println!("{line}");
        }
    } else {
        println!("{}", format_shopping_note(&list));
    }
    Ok(())
}
