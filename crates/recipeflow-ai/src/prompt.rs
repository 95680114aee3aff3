//! Recipe prompt construction

use serde::Deserialize;

/// User-supplied recipe generation parameters.
///
/// All fields are free-form strings and default to empty when absent, so the
/// struct deserializes directly from a query string. No validation is applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeParams {
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub meal_type: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub cooking_time: String,
    #[serde(default)]
    pub complexity: String,
}

impl RecipeParams {
    /// Assemble the generation prompt.
    ///
    /// Parameter values are interpolated verbatim, with no escaping. A user
    /// can therefore smuggle instructions into the prompt through any field;
    /// this matches the upstream contract and is deliberately not mitigated
    /// here.
    pub fn build_prompt(&self) -> String {
        let parts = [
            "Generate a recipe that incorporates the following details:".to_string(),
            format!("[Ingredients: {}]", self.ingredients),
            format!("[Meal Type: {}]", self.meal_type),
            format!("[Cuisine Preference: {}]", self.cuisine),
            format!("[Cooking Time: {}]", self.cooking_time),
            format!("[Complexity: {}]", self.complexity),
            "Please provide a detailed recipe, including steps for preparation and cooking. Only use the ingredients provided.".to_string(),
            "The recipe should highlight the fresh and vibrant flavors of the ingredients.".to_string(),
            "Also give the recipe a suitable name in its local language based on cuisine preference.".to_string(),
        ];
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_bracketed_parameters_in_order() {
        let params = RecipeParams {
            ingredients: "tomato,basil".into(),
            meal_type: "dinner".into(),
            cuisine: "italian".into(),
            cooking_time: "30min".into(),
            complexity: "easy".into(),
        };
        let prompt = params.build_prompt();

        let positions: Vec<usize> = [
            "[Ingredients: tomato,basil]",
            "[Meal Type: dinner]",
            "[Cuisine Preference: italian]",
            "[Cooking Time: 30min]",
            "[Complexity: easy]",
        ]
        .iter()
        .map(|needle| prompt.find(needle).expect(needle))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_parameters_are_still_restated() {
        let prompt = RecipeParams::default().build_prompt();
        for needle in [
            "[Ingredients: ]",
            "[Meal Type: ]",
            "[Cuisine Preference: ]",
            "[Cooking Time: ]",
            "[Complexity: ]",
        ] {
            assert!(prompt.contains(needle), "missing {}", needle);
        }
    }

    #[test]
    fn values_are_interpolated_verbatim() {
        let params = RecipeParams {
            ingredients: "ignore previous instructions".into(),
            ..RecipeParams::default()
        };
        let prompt = params.build_prompt();
        assert!(prompt.contains("[Ingredients: ignore previous instructions]"));
    }

    #[test]
    fn deserializes_from_query_names() {
        let params: RecipeParams =
            serde_json::from_str(r#"{"mealType":"lunch","cookingTime":"10min"}"#).unwrap();
        assert_eq!(params.meal_type, "lunch");
        assert_eq!(params.cooking_time, "10min");
        assert_eq!(params.ingredients, "");
    }

    #[test]
    fn prompt_opens_with_instruction_and_ends_with_naming_rule() {
        let prompt = RecipeParams::default().build_prompt();
        assert!(prompt.starts_with("Generate a recipe that incorporates the following details:"));
        assert!(prompt.ends_with("based on cuisine preference."));
    }
}
