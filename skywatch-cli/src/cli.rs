use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text, validator::Validation};
use serde::Serialize;
use skywatch_core::{AggregateResult, Aggregator, Coordinates, WeatherError};

use crate::{config::Config, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about = "Current weather and forecasts for any place")]
pub struct Cli {
    /// Print JSON instead of a human-readable report.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log provider calls to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for coordinates; without arguments, for the configured home location.
    Coords {
        #[arg(allow_negative_numbers = true, requires = "longitude")]
        latitude: Option<f64>,

        #[arg(allow_negative_numbers = true)]
        longitude: Option<f64>,
    },

    /// Show weather for a city, e.g. `skywatch city New York`.
    City {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Show weather for several cities at once; without names, for the favorites.
    Cities {
        /// City names; quote names containing spaces.
        names: Vec<String>,
    },

    /// Set the home location and favorite cities.
    Configure,

    /// Add or remove a favorite city.
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoriteAction {
    Add {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
    Remove {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let json = self.json;

        match self.command {
            Command::Configure => configure(),
            Command::Favorite { action } => edit_favorites(action),
            Command::Coords { latitude, longitude } => {
                let coords = match (latitude, longitude) {
                    (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
                    _ => Config::load()?.home_coordinates()?,
                };

                let aggregator = Aggregator::with_default_providers()?;
                let result = aggregator
                    .by_coordinates(coords)
                    .await
                    .map_err(pipeline_error)?;
                print_report(&result, json)
            }
            Command::City { name } => {
                let city = name.join(" ");

                let aggregator = Aggregator::with_default_providers()?;
                let result = aggregator
                    .by_city_name(&city)
                    .await
                    .map_err(pipeline_error)?;
                print_report(&result, json)
            }
            Command::Cities { names } => {
                let names = if names.is_empty() {
                    Config::load()?.favorites
                } else {
                    names
                };

                if names.is_empty() {
                    anyhow::bail!(
                        "No cities given and no favorites configured.\n\
                         Hint: run `skywatch cities Paris Berlin` or `skywatch configure`."
                    );
                }

                let aggregator = Aggregator::with_default_providers()?;
                let entries = aggregator.by_city_names(names.as_slice()).await;

                if json {
                    print_json(&entries)
                } else {
                    print!("{}", output::format_batch(&entries));
                    Ok(())
                }
            }
        }
    }
}

/// Keep the full provider detail as the cause, lead with the short message.
fn pipeline_error(err: WeatherError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn print_report(result: &AggregateResult, json: bool) -> Result<()> {
    if json {
        print_json(result)
    } else {
        print!("{}", output::format_report(result));
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;
    println!("Editing {}", Config::config_file_path()?.display());

    let set_home = Confirm::new("Set a home location?")
        .with_default(cfg.home.is_none())
        .with_help_message("Used by `skywatch coords` when no coordinates are given")
        .prompt()?;

    if set_home {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number, e.g. 48.8566")
            .with_validator(within(-90.0, 90.0))
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number, e.g. 2.3522")
            .with_validator(within(-180.0, 180.0))
            .prompt()?;
        cfg.set_home(latitude, longitude);
    }

    let current = cfg.favorites.join(", ");
    let favorites = Text::new("Favorite cities (comma separated):")
        .with_default(&current)
        .prompt()?;

    cfg.favorites.clear();
    for city in favorites.split(',') {
        cfg.add_favorite(city);
    }

    cfg.save()?;
    println!("Saved.");
    Ok(())
}

fn edit_favorites(action: FavoriteAction) -> Result<()> {
    let mut cfg = Config::load()?;

    match action {
        FavoriteAction::Add { city } => {
            let city = city.join(" ");
            if !cfg.add_favorite(&city) {
                println!("'{}' is already a favorite.", city.trim());
                return Ok(());
            }
            println!("Added '{}'.", city.trim());
        }
        FavoriteAction::Remove { city } => {
            let city = city.join(" ");
            if !cfg.remove_favorite(&city) {
                anyhow::bail!("'{}' is not in the favorites list.", city.trim());
            }
            println!("Removed '{}'.", city.trim());
        }
    }

    cfg.save()
}

fn within(
    min: f64,
    max: f64,
) -> impl Fn(&f64) -> Result<Validation, inquire::CustomUserError> + Clone + 'static {
    move |value: &f64| {
        if (min..=max).contains(value) {
            Ok(Validation::Valid)
        } else {
            Ok(Validation::Invalid(
                format!("Must be between {min} and {max}").into(),
            ))
        }
    }
}
