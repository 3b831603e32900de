/// A named diet profile offered as a plan variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DietPreset {
    pub name: &'static str,
    pub description: &'static str,
    /// Informational only; selection does not filter on it yet.
    pub bias: &'static str,
}

pub const DIET_PRESETS: [DietPreset; 10] = [
    DietPreset {
        name: "Muscle Gain",
        description: "High protein meals to support muscle growth.",
        bias: "protein",
    },
    DietPreset {
        name: "Weight Loss",
        description: "Calorie-conscious meals for steady weight loss.",
        bias: "low_cal",
    },
    DietPreset {
        name: "Keto",
        description: "Low carb, high fat diet.",
        bias: "keto",
    },
    DietPreset {
        name: "Paleo",
        description: "Whole foods, no processed grains.",
        bias: "paleo",
    },
    DietPreset {
        name: "Vegan",
        description: "Plant-based power.",
        bias: "vegan",
    },
    DietPreset {
        name: "Vegetarian",
        description: "Meat-free balanced diet.",
        bias: "veg",
    },
    DietPreset {
        name: "Balanced",
        description: "A mix of all macronutrients.",
        bias: "balanced",
    },
    DietPreset {
        name: "Low Carb",
        description: "Reduced carbohydrates.",
        bias: "low_carb",
    },
    DietPreset {
        name: "High Energy",
        description: "Complex carbs for sustained energy.",
        bias: "energy",
    },
    DietPreset {
        name: "Budget Friendly",
        description: "Cost-effective nutritious meals.",
        bias: "budget",
    },
];
