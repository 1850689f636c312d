//! Shapes returned by the external meal-analysis service.
//!
//! The analysis itself happens remotely; these types only decode its
//! responses so a front end can combine them with the local ledgers.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// One recognized food within a meal
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub grams: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Result of analysing a meal from an image, text or barcode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MealAnalysis {
    pub total_calories: f64,
    pub total_macros: Macros,
    #[serde(default)]
    pub foods: Vec<FoodItem>,
}

/// Totals the service reports for one day
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyNutritionSummary {
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_macros: Macros,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_meal_analysis_with_extra_fields() {
        let json = r#"{
            "meal_id": "m-1",
            "source": "text",
            "total_calories": 520.0,
            "total_macros": {"protein_g": 32.0, "carbs_g": 48.5, "fat_g": 18.0},
            "foods": [
                {"name": "Chicken breast", "grams": 150, "calories": 248,
                 "protein_g": 31, "carbs_g": 0, "fat_g": 5.4,
                 "model_label": "chicken", "confidence": 0.92}
            ]
        }"#;

        let meal: MealAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(meal.foods.len(), 1);
        assert_eq!(meal.foods[0].name, "Chicken breast");
        assert_eq!(meal.total_macros.carbs_g, 48.5);
    }

    #[test]
    fn test_decode_daily_summary() {
        let json = r#"{"date": "2024-01-01", "total_calories": 1450.5,
                       "total_macros": {"protein_g": 90, "carbs_g": 150, "fat_g": 50},
                       "remaining_calories": 549.5}"#;
        let summary: DailyNutritionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_calories, 1450.5);
        assert_eq!(summary.total_macros.protein_g, 90.0);

        let empty: DailyNutritionSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DailyNutritionSummary::default());
    }
}
