// BMI Classification - ordered threshold bands
// Bands are checked low to high; the lower bound of each band is inclusive.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::Normal => "Normal weight",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Category::Underweight => "Consider healthy diet.",
            Category::Normal => "Keep it up!",
            Category::Overweight => "Exercise and diet recommended.",
            Category::Obese => "Seek medical advice and adopt healthier lifestyle.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper (exclusive) bound of every band but the last
const BANDS: [(f64, Category); 3] = [
    (18.5, Category::Underweight),
    (25.0, Category::Normal),
    (30.0, Category::Overweight),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub advice: &'static str,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category.label(), self.advice)
    }
}

/// Map a BMI to its band. Total over all inputs; anything at or above the
/// last bound is `Obese`.
pub fn classify(bmi: f64) -> Classification {
    let category = BANDS
        .iter()
        .find(|(upper, _)| bmi < *upper)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Obese);

    Classification {
        category,
        advice: category.advice(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_representatives() {
        assert_eq!(classify(16.0).category, Category::Underweight);
        assert_eq!(classify(22.49).category, Category::Normal);
        assert_eq!(classify(27.0).category, Category::Overweight);
        assert_eq!(classify(41.0).category, Category::Obese);
    }

    #[test]
    fn test_boundaries_land_in_upper_band() {
        assert_eq!(classify(18.5).category, Category::Normal);
        assert_eq!(classify(25.0).category, Category::Overweight);
        assert_eq!(classify(30.0).category, Category::Obese);

        assert_eq!(classify(18.499).category, Category::Underweight);
        assert_eq!(classify(24.999).category, Category::Normal);
        assert_eq!(classify(29.999).category, Category::Overweight);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let mut previous = classify(0.01).category;
        let mut bmi = 0.01;
        while bmi < 60.0 {
            let current = classify(bmi).category;
            assert!(current >= previous, "severity dropped at bmi {bmi}");
            previous = current;
            bmi += 0.05;
        }
        assert_eq!(previous, Category::Obese);
    }

    #[test]
    fn test_advice_text() {
        let c = classify(22.0);
        assert_eq!(c.advice, "Keep it up!");
        assert_eq!(c.to_string(), "Normal weight: Keep it up!");
        assert_eq!(
            classify(35.0).to_string(),
            "Obese: Seek medical advice and adopt healthier lifestyle."
        );
    }
}
