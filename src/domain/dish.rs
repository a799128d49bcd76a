//! Dish model returned by search providers.
//!
//! A [`Dish`] is one row of the result list. The list controller treats it
//! as opaque apart from [`Dish::id`], which identifies it within the list and
//! is used to splice in edits coming back from the detail screen.

use super::query::Canteen;
use serde::{Deserialize, Serialize};

/// Stable identifier of a dish across pages and screens.
pub type DishId = u64;

/// A searchable dish as shown in the result list.
///
/// `rate` is the average review score and `rate_number` the number of reviews
/// behind it; posting a review on the detail screen changes both, which is
/// why the list accepts in-place replacements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    /// Price in whole yuan.
    pub price: u32,
    pub canteen: Canteen,
    /// Energy per serving in kcal.
    pub calorie: u32,
    pub rate: f32,
    pub rate_number: u32,
    pub picture_url: String,
}

impl Dish {
    /// Creates a dish with no reviews and no picture.
    ///
    /// # Examples
    ///
    /// ```
    /// use dishlist::{Canteen, Dish};
    ///
    /// let dish = Dish::new(7, "番茄炒蛋", 3, Canteen::JiaYuan1);
    /// assert_eq!(dish.rate_number, 0);
    /// assert!(dish.picture_url.is_empty());
    /// ```
    #[must_use]
    pub fn new(id: DishId, name: impl Into<String>, price: u32, canteen: Canteen) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            canteen,
            calorie: 0,
            rate: 0.0,
            rate_number: 0,
            picture_url: String::new(),
        }
    }

    /// Returns a copy with one more review folded into the average.
    ///
    /// This is the shape of the update a review screen hands back.
    #[must_use]
    pub fn with_review(&self, score: f32) -> Self {
        let count = self.rate_number.saturating_add(1);
        #[allow(clippy::cast_precision_loss)]
        let total = self.rate.mul_add(self.rate_number as f32, score);
        #[allow(clippy::cast_precision_loss)]
        let rate = total / count as f32;
        Self {
            rate,
            rate_number: count,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_review_updates_average_and_count() {
        let mut dish = Dish::new(1, "宫保鸡丁", 12, Canteen::XueYi);
        dish.rate = 4.0;
        dish.rate_number = 3;

        let reviewed = dish.with_review(5.0);
        assert_eq!(reviewed.rate_number, 4);
        assert!((reviewed.rate - 4.25).abs() < f32::EPSILON);
        assert_eq!(reviewed.id, dish.id);
        assert_eq!(reviewed.name, dish.name);
    }

    #[test]
    fn test_deserializes_catalog_shape() {
        let json = r#"{
            "id": 3,
            "name": "番茄炒蛋",
            "price": 3,
            "canteen": "JiaYuan1",
            "calorie": 32,
            "rate": 4.0,
            "rate_number": 1333,
            "picture_url": "/images/dishitem/example.png"
        }"#;
        let dish: Dish = serde_json::from_str(json).unwrap();
        assert_eq!(dish.canteen, Canteen::JiaYuan1);
        assert_eq!(dish.rate_number, 1333);
    }
}
