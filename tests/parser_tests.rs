//! # Recipe Parser Tests
//!
//! Mapping of generated payloads into recipes: ordering, optional fields and
//! difficulty fallback.

use recipeasy_ingest::ingestion_errors::IngestionError;
use recipeasy_ingest::recipe_parser::parse_recipe;
use recipeasy_ingest::Difficulty;

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with_difficulty(difficulty: &str) -> String {
        serde_json::json!({
            "name": "Shakshuka",
            "description": "Eggs poached in spiced tomato sauce",
            "cookingTimeMinutes": 35,
            "difficulty": difficulty,
            "ingredients": [],
            "steps": [],
            "notes": ""
        })
        .to_string()
    }

    #[test]
    fn test_known_difficulties() {
        let cases = [
            ("easy", Difficulty::Easy),
            ("medium", Difficulty::Medium),
            ("hard", Difficulty::Hard),
            ("Hard", Difficulty::Hard),
            ("EASY", Difficulty::Easy),
        ];

        for (token, expected) in cases {
            let recipe = parse_recipe(&payload_with_difficulty(token)).unwrap();
            assert_eq!(recipe.difficulty, expected, "token {token:?}");
        }
    }

    #[test]
    fn test_unrecognized_difficulty_becomes_medium() {
        for token in ["", "expert", "very hard", "facile", "3"] {
            let recipe = parse_recipe(&payload_with_difficulty(token)).unwrap();
            assert_eq!(recipe.difficulty, Difficulty::Medium, "token {token:?}");
        }
    }

    #[test]
    fn test_ingredients_and_steps_keep_payload_order() {
        let content = r#"{
            "name": "Crêpes",
            "description": "Thin French pancakes",
            "cookingTimeMinutes": 30,
            "difficulty": "easy",
            "ingredients": [
                {"name": "farine", "amount": 125, "unit": "g"},
                {"name": "œufs", "amount": 2, "unit": "", "notes": "à température ambiante"},
                {"name": "lait", "amount": 0.5, "unit": "l"}
            ],
            "steps": [
                {"orderIndex": 0, "description": "Mélanger la farine et les œufs"},
                {"orderIndex": 1, "description": "Ajouter le lait", "durationMinutes": 2},
                {"orderIndex": 2, "description": "Laisser reposer", "durationMinutes": 60, "notes": "au frais"}
            ],
            "notes": "Servir avec du sucre"
        }"#;

        let recipe = parse_recipe(content).unwrap();

        let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["farine", "œufs", "lait"]);
        assert_eq!(recipe.ingredients[1].notes.as_deref(), Some("à température ambiante"));
        assert!(recipe.ingredients[1].is_unitless());
        assert_eq!(recipe.ingredients[2].amount, 0.5);

        assert_eq!(recipe.steps.len(), 3);
        assert_eq!(recipe.steps[0].duration_minutes, None);
        assert_eq!(recipe.steps[1].duration_minutes, Some(2));
        assert_eq!(recipe.steps[2].notes.as_deref(), Some("au frais"));
        assert_eq!(recipe.notes, "Servir avec du sucre");
        assert!(recipe.is_valid());
    }

    #[test]
    fn test_missing_ingredient_amount_fails() {
        let content = r#"{"name":"Tea","description":"","cookingTimeMinutes":5,"difficulty":"easy",
            "ingredients":[{"name":"tea","unit":"bag"}],"steps":[]}"#;

        match parse_recipe(content) {
            Err(IngestionError::DecodingFailure(cause)) => assert!(cause.contains("amount")),
            other => panic!("expected decoding failure, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_content_fails() {
        assert!(matches!(parse_recipe(""), Err(IngestionError::DecodingFailure(_))));
    }

    #[test]
    fn test_fenced_json_is_not_accepted() {
        let content = format!("```json\n{}\n```", payload_with_difficulty("easy"));
        assert!(matches!(
            parse_recipe(&content),
            Err(IngestionError::DecodingFailure(_))
        ));
    }

    fn payload_with_cooking_time(raw: &str) -> String {
        format!(
            r#"{{"name":"Veggie Pasta","description":"Quick and healthy","cookingTimeMinutes":{raw},
                "difficulty":"easy","ingredients":[{{"name":"Pasta","amount":200,"unit":"g"}}],
                "steps":[{{"orderIndex":0.0,"description":"Boil pasta","durationMinutes":10.0}}],"notes":""}}"#
        )
    }

    #[test]
    fn test_whole_float_integers_are_accepted() {
        let recipe = parse_recipe(&payload_with_cooking_time("25.0")).unwrap();

        assert_eq!(recipe.cooking_time_minutes, 25);
        assert_eq!(recipe.steps[0].order_index, 0);
        assert_eq!(recipe.steps[0].duration_minutes, Some(10));
    }

    #[test]
    fn test_fractional_cooking_time_fails() {
        assert!(matches!(
            parse_recipe(&payload_with_cooking_time("25.5")),
            Err(IngestionError::DecodingFailure(_))
        ));
    }

    #[test]
    fn test_negative_float_cooking_time_fails() {
        for raw in ["-25.0", "-25"] {
            assert!(
                matches!(
                    parse_recipe(&payload_with_cooking_time(raw)),
                    Err(IngestionError::DecodingFailure(_))
                ),
                "cookingTimeMinutes {raw}"
            );
        }
    }

    #[test]
    fn test_string_cooking_time_fails() {
        assert!(matches!(
            parse_recipe(&payload_with_cooking_time("\"25\"")),
            Err(IngestionError::DecodingFailure(_))
        ));
    }
}
