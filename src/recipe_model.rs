//! # Recipe Data Model
//!
//! This module defines the canonical recipe record produced by the ingestion
//! pipeline: a recipe owning its ingredients and cooking steps.
//!
//! ## Core Concepts
//!
//! - **Recipe**: a named dish with ingredients, steps, time and difficulty
//! - **Ingredient**: a named amount in a free-form unit ("" means unitless)
//! - **CookingStep**: an instruction ordered by its explicit `order_index`
//! - **Difficulty**: easy, medium or hard
//!
//! ## Usage
//!
//! ```rust
//! use recipeasy_ingest::recipe_model::{CookingStep, Difficulty, Ingredient, Recipe};
//!
//! let recipe = Recipe::new("Veggie Pasta")
//!     .with_ingredient(Ingredient::new("Pasta", 200.0, "g"))
//!     .with_step(CookingStep::new(0, "Boil pasta").with_duration(10))
//!     .with_difficulty(Difficulty::Easy);
//!
//! assert_eq!(recipe.ingredients.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// How hard a recipe is to cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Easy
    Easy,
    /// Medium, also the fallback for unrecognized tokens
    #[default]
    Medium,
    /// Hard
    Hard,
}

impl Difficulty {
    /// Map a model-supplied token to a difficulty, case-insensitively.
    ///
    /// Unrecognized tokens fall back to [`Difficulty::Medium`] instead of failing.
    pub fn from_token(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    /// Lowercase wire token
    pub fn token(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// An ingredient owned by exactly one recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Name of the ingredient (e.g., "Pasta", "olive oil")
    pub name: String,
    /// Amount in `unit`
    pub amount: f64,
    /// Unit of measurement, empty when unitless (e.g., "2 eggs")
    pub unit: String,
    /// Optional preparation notes
    pub notes: Option<String>,
}

/// A cooking step owned by exactly one recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingStep {
    /// Authoritative position of the step within its recipe
    pub order_index: u32,
    /// What to do
    pub description: String,
    /// Optional duration in minutes
    pub duration_minutes: Option<u32>,
    /// Optional notes
    pub notes: Option<String>,
}

/// A complete recipe record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier, generated at creation
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Ingredients in insertion order
    pub ingredients: Vec<Ingredient>,
    /// Steps in storage order; use [`Recipe::ordered_steps`] for cooking order
    pub steps: Vec<CookingStep>,
    pub cooking_time_minutes: u32,
    pub difficulty: Difficulty,
    pub notes: String,
    /// Whether the recipe came out of the AI ingestion pipeline
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

/// A problem found by [`Recipe::validation_issues`]
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// Ingredient at this position has an empty name
    EmptyIngredientName(usize),
    /// Ingredient at this position has a negative or non-finite amount
    InvalidAmount(usize),
    /// Step at this position has an empty description
    EmptyStepDescription(usize),
    /// Step at this position declares a zero duration
    ZeroStepDuration(usize),
    /// Several steps share this order index
    DuplicateOrderIndex(u32),
}

impl Ingredient {
    /// Create an ingredient without notes
    pub fn new(name: &str, amount: f64, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            amount,
            unit: unit.to_string(),
            notes: None,
        }
    }

    /// Add notes to this ingredient
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Whether the ingredient is counted rather than measured
    pub fn is_unitless(&self) -> bool {
        self.unit.trim().is_empty()
    }
}

impl CookingStep {
    /// Create a step without duration or notes
    pub fn new(order_index: u32, description: &str) -> Self {
        Self {
            order_index,
            description: description.to_string(),
            duration_minutes: None,
            notes: None,
        }
    }

    /// Set the duration in minutes
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Add notes to this step
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

impl Recipe {
    /// Create an empty, user-authored recipe stamped with the current time
    pub fn new(name: &str) -> Self {
        Self::new_at(name, Utc::now())
    }

    /// Create an empty recipe with both timestamps set to `now`
    pub fn new_at(name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            cooking_time_minutes: 0,
            difficulty: Difficulty::default(),
            notes: String::new(),
            is_ai_generated: false,
            date_created: now,
            date_modified: now,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    pub fn with_step(mut self, step: CookingStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_cooking_time(mut self, minutes: u32) -> Self {
        self.cooking_time_minutes = minutes;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    /// Steps sorted by `order_index`; ties keep their storage order
    pub fn ordered_steps(&self) -> Vec<&CookingStep> {
        let mut steps: Vec<&CookingStep> = self.steps.iter().collect();
        steps.sort_by_key(|step| step.order_index);
        steps
    }

    /// Order indices used by more than one step, ascending
    pub fn duplicate_step_indices(&self) -> Vec<u32> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for step in &self.steps {
            *counts.entry(step.order_index).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(index, _)| index)
            .collect()
    }

    /// Report field-level problems without rejecting the recipe
    pub fn validation_issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (position, ingredient) in self.ingredients.iter().enumerate() {
            if ingredient.name.trim().is_empty() {
                issues.push(ValidationIssue::EmptyIngredientName(position));
            }
            if !ingredient.amount.is_finite() || ingredient.amount < 0.0 {
                issues.push(ValidationIssue::InvalidAmount(position));
            }
        }

        for (position, step) in self.steps.iter().enumerate() {
            if step.description.trim().is_empty() {
                issues.push(ValidationIssue::EmptyStepDescription(position));
            }
            if step.duration_minutes == Some(0) {
                issues.push(ValidationIssue::ZeroStepDuration(position));
            }
        }

        issues.extend(
            self.duplicate_step_indices()
                .into_iter()
                .map(ValidationIssue::DuplicateOrderIndex),
        );

        issues
    }

    /// Whether [`Recipe::validation_issues`] finds nothing
    pub fn is_valid(&self) -> bool {
        self.validation_issues().is_empty()
    }
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unitless() {
            write!(f, "{} {}", format_amount(self.amount), self.name)?;
        } else {
            write!(f, "{} {} {}", format_amount(self.amount), self.unit, self.name)?;
        }

        if let Some(notes) = &self.notes {
            write!(f, " ({notes})")?;
        }

        Ok(())
    }
}

impl fmt::Display for CookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;

        if let Some(minutes) = self.duration_minutes {
            write!(f, " [{minutes} min]")?;
        }

        if let Some(notes) = &self.notes {
            write!(f, " ({notes})")?;
        }

        Ok(())
    }
}

/// Printable plain-text sheet
impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        writeln!(
            f,
            "Time: {} min | Difficulty: {}",
            self.cooking_time_minutes, self.difficulty
        )?;

        writeln!(f)?;
        writeln!(f, "Ingredients:")?;
        for (i, ingredient) in self.ingredients.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, ingredient)?;
        }

        writeln!(f)?;
        writeln!(f, "Steps:")?;
        for (i, step) in self.ordered_steps().into_iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, step)?;
        }

        if !self.notes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Notes:")?;
            writeln!(f, "  {}", self.notes)?;
        }

        Ok(())
    }
}
