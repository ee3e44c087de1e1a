use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::{Date, Weekday};

use crate::FetchError;

pub const ENTREES: &str = "ENTREES";

/// Categories shown by the curated view, in display order.
pub const PREFERRED_CATEGORIES: [&str; 4] = [ENTREES, "VEGETABLES", "FRUITS", "MILK"];

/// A single line of a cafeteria menu as returned by the menu API.
///
/// Every attribute is optional because the API omits or blanks them freely.
/// An item without a description can't be displayed or matched. The
/// description is kept as sent so PreK matching compares exact text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "MenuItemDescription", default, deserialize_with = "raw_text")]
    pub description: Option<String>,
    #[serde(rename = "ServingSizeByGrade", default, deserialize_with = "lenient_text")]
    pub serving_size: Option<String>,
    #[serde(rename = "Calories", default, deserialize_with = "lenient_text")]
    pub calories: Option<String>,
    #[serde(rename = "Allergens", default, deserialize_with = "lenient_text")]
    pub allergens: Option<String>,
}

impl MenuItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn serving_size(mut self, value: impl Into<String>) -> Self {
        self.serving_size = Some(value.into());
        self
    }

    pub fn calories(mut self, value: impl Into<String>) -> Self {
        self.calories = Some(value.into());
        self
    }

    pub fn allergens(mut self, value: impl Into<String>) -> Self {
        self.allergens = Some(value.into());
        self
    }
}

/// Strings are trimmed and blank means absent, numbers keep their written form
/// and a zero count means absent. Anything else is ignored.
/// Like [`lenient_text`] but non-blank strings are kept untrimmed.
fn raw_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::String(text)) => (!text.trim().is_empty()).then_some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::String(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_owned())
        }
        Some(Value::Number(number)) => {
            let is_zero = number.as_f64().is_some_and(|n| n == 0.0);
            (!is_zero).then(|| number.to_string())
        }
        _ => None,
    })
}

/// Category name to items for one school, date, grade, serving line and meal.
///
/// An empty menu is a confirmed "no service" day, not a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    categories: BTreeMap<String, Vec<MenuItem>>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(
        mut self,
        name: impl Into<String>,
        items: impl IntoIterator<Item = MenuItem>,
    ) -> Self {
        self.categories
            .insert(name.into(), items.into_iter().collect());
        self
    }

    /// Decodes the API payload.
    ///
    /// `null` and `[]` are how the API answers for days without service.
    pub fn from_json(value: Value) -> Result<Self, FetchError> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Array(entries) if entries.is_empty() => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(FetchError::Decode(format!(
                    "expected an object of menu categories, got {}",
                    json_kind(&other)
                )));
            }
        };

        let mut categories = BTreeMap::new();

        for (name, entries) in object {
            let Value::Array(entries) = entries else {
                tracing::debug!(category = %name, "skipping non-list menu category");
                continue;
            };

            let items = entries
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|entry| serde_json::from_value::<MenuItem>(entry).ok())
                .collect::<Vec<_>>();

            categories.insert(name, items);
        }

        Ok(Self { categories })
    }

    /// Items of a category, looked up by exact name.
    pub fn category(&self, name: &str) -> &[MenuItem] {
        self.categories
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[MenuItem])> {
        self.categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// True when there are no categories or every category is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    /// Entree descriptions in menu order, skipping items without one.
    pub fn entree_descriptions(&self) -> Vec<&str> {
        self.category(ENTREES)
            .iter()
            .filter_map(|item| item.description.as_deref())
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a non-empty array",
        Value::Object(_) => "an object",
    }
}

/// A calendar date the report targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServingDay {
    pub date: Date,
    pub weekday: Weekday,
}

impl ServingDay {
    pub fn new(date: Date) -> Self {
        Self {
            date,
            weekday: date.weekday(),
        }
    }

    /// `MM/DD/YYYY`, the format the menu API expects.
    pub fn serving_date(&self) -> String {
        format!(
            "{:02}/{:02}/{}",
            u8::from(self.date.month()),
            self.date.day(),
            self.date.year()
        )
    }

    /// `Thursday, October 15, 2026`
    pub fn long_date(&self) -> String {
        format!(
            "{}, {} {:02}, {}",
            self.weekday,
            self.date.month(),
            self.date.day(),
            self.date.year()
        )
    }

    /// `October 15, 2026`
    pub fn month_day_year(&self) -> String {
        format!(
            "{} {:02}, {}",
            self.date.month(),
            self.date.day(),
            self.date.year()
        )
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Saturday | Weekday::Sunday)
    }
}

impl fmt::Display for ServingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.weekday, self.serving_date())
    }
}

/// Ordered target dates of one run. Never mutated once resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateWindow(Vec<ServingDay>);

impl DateWindow {
    pub fn new(days: impl IntoIterator<Item = ServingDay>) -> Self {
        Self(days.into_iter().collect())
    }

    pub fn days(&self) -> &[ServingDay] {
        &self.0
    }

    pub fn dates(&self) -> Vec<Date> {
        self.0.iter().map(|day| day.date).collect()
    }

    pub fn first(&self) -> Option<&ServingDay> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServingDay> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DateWindow {
    type Item = &'a ServingDay;
    type IntoIter = std::slice::Iter<'a, ServingDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parameters of one menu API lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuQuery {
    pub school_id: String,
    pub serving_date: String,
    pub serving_line: String,
    pub meal_type: String,
    pub grade: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Daily,
    Weekly,
}

/// Which categories a report shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryView {
    /// Entrees, vegetables, fruits and milk only.
    #[default]
    Curated,
    /// Preferred categories first, then every other category by name.
    Full,
}
